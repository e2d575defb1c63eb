//! Plain-text message assembly
//!
//! Emit methods accept a single string or a list of parts. Parts are joined
//! with one space and written straight into the pooled entry's buffer.

use super::log_entry::push_sanitized;

/// Anything that can be written as a log message.
///
/// # Example
///
/// ```
/// use fanout_logger::IntoMessage;
///
/// let mut buf = String::new();
/// ["user", "42", "logged in"].write_message(&mut buf);
/// assert_eq!(buf, "user 42 logged in");
/// ```
pub trait IntoMessage {
    /// Append the sanitized message to `buf`.
    fn write_message(self, buf: &mut String);
}

fn join_parts<I, S>(parts: I, buf: &mut String)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (idx, part) in parts.into_iter().enumerate() {
        if idx > 0 {
            buf.push(' ');
        }
        push_sanitized(buf, part.as_ref());
    }
}

impl IntoMessage for &str {
    fn write_message(self, buf: &mut String) {
        push_sanitized(buf, self);
    }
}

impl IntoMessage for String {
    fn write_message(self, buf: &mut String) {
        push_sanitized(buf, &self);
    }
}

impl IntoMessage for &String {
    fn write_message(self, buf: &mut String) {
        push_sanitized(buf, self);
    }
}

impl<S: AsRef<str>, const N: usize> IntoMessage for [S; N] {
    fn write_message(self, buf: &mut String) {
        join_parts(self, buf);
    }
}

impl<S: AsRef<str>> IntoMessage for &[S] {
    fn write_message(self, buf: &mut String) {
        join_parts(self, buf);
    }
}

impl<S: AsRef<str>> IntoMessage for Vec<S> {
    fn write_message(self, buf: &mut String) {
        join_parts(self, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(message: impl IntoMessage) -> String {
        let mut buf = String::new();
        message.write_message(&mut buf);
        buf
    }

    #[test]
    fn test_single_string() {
        assert_eq!(render("hello world"), "hello world");
        assert_eq!(render(String::from("owned")), "owned");
    }

    #[test]
    fn test_parts_joined_with_one_space() {
        assert_eq!(render(["a", "b", "c"]), "a b c");
        assert_eq!(render(vec![String::from("x"), String::from("y")]), "x y");
        let parts: &[&str] = &["only"];
        assert_eq!(render(parts), "only");
    }

    #[test]
    fn test_no_parts_is_empty() {
        let parts: [&str; 0] = [];
        assert_eq!(render(parts), "");
    }

    #[test]
    fn test_parts_are_sanitized() {
        assert_eq!(render(["a\nb", "c"]), "a\\nb c");
    }
}
