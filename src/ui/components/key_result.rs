/// What a component did with a key press.
///
/// Views ask their overlays first and only fall back to their own bindings
/// on `NotHandled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed with nothing for the parent to do
  Handled,
  /// Consumed, and the parent should react to this event
  Event(T),
  /// Not consumed; try the next handler
  NotHandled,
}

impl<T> KeyResult<T> {
  /// Whether the component consumed the key
  pub fn is_consumed(&self) -> bool {
    !matches!(self, KeyResult::NotHandled)
  }
}
