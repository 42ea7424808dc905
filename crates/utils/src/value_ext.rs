use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    ///
    /// ```rust
    /// # use cccc_utils::ValueExt;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// assert_eq!(f64::NAN.sci(5, 2), "NaN".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// FORTRAN `E` edit descriptor with a forced sign, i.e. `%+.<p>E`
    ///
    /// The mantissa always carries a sign, the exponent marker is upper case
    /// and the exponent is signed and zero padded to at least `exp_pad`
    /// digits.
    ///
    /// Non-finite values have no exponent and come out as `NaN`, `+inf` or
    /// `-inf`, all of which parse back with `str::parse::<f64>()`.
    ///
    /// ```rust
    /// # use cccc_utils::ValueExt;
    /// assert_eq!((1.0).fortran(16, 2), "+1.0000000000000000E+00".to_string());
    /// assert_eq!((-2.5e-10).fortran(3, 2), "-2.500E-10".to_string());
    /// assert_eq!((1.0e300).fortran(2, 2), "+1.00E+300".to_string());
    /// assert_eq!(f64::INFINITY.fortran(2, 2), "+inf".to_string());
    /// ```
    fn fortran(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // NaN and infinity have nothing to pad
        let Some(split) = num.find('e') else {
            return num;
        };
        let exp = num.split_off(split);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn fortran(&self, precision: usize, exp_pad: usize) -> String {
        let num = self.sci(precision, exp_pad).replace('e', "E");
        if num.starts_with('-') || num == "NaN" {
            num
        } else {
            f!("+{num}")
        }
    }
}
