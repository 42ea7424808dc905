/// Extends string types with fixed width field helpers
pub trait StringExt {
    /// Left justify into a field of exactly `width` characters
    ///
    /// Shorter strings are padded with trailing spaces. Returns `None` when the
    /// string does not fit, as truncating a label silently would corrupt it.
    ///
    /// ```rust
    /// # use cccc_utils::StringExt;
    /// assert_eq!("U235".fixed_width(8), Some("U235    ".to_string()));
    /// assert_eq!("U235AA".fixed_width(6), Some("U235AA".to_string()));
    /// assert_eq!("TOO LONG".fixed_width(4), None);
    /// ```
    fn fixed_width(&self, width: usize) -> Option<String>;
}

impl<T: AsRef<str>> StringExt for T {
    fn fixed_width(&self, width: usize) -> Option<String> {
        let s = self.as_ref();
        match s.len() <= width {
            true => Some(format!("{s:<width$}")),
            false => None,
        }
    }
}
