pub use usererrordisplay_impl::UserErrorDisplay;

/// Errors that are surfaced to whoever wrote the query string. Every code is
/// stable; callers map these to client errors.
pub trait UserError {
    fn code(&self) -> u32;
    fn user_message(&self) -> Option<String>;
    fn technical_message(&self) -> String;
}
