use std::any::Any;

/// Extracts a human-readable message from a panic payload.
///
/// Handles the two payload shapes `panic!` produces (`&'static str` and
/// `String`); anything else is reported generically.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&'static str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"non-string panic payload".to_string()
	}
}
