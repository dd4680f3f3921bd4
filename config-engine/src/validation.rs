// Post-load validation of typed configuration

/// Checks run after a configuration has been extracted.
pub trait Validate {
    /// # Errors
    ///
    /// A human readable description of the first violation found.
    fn validate(&self) -> std::result::Result<(), String>;
}
