mod text_field;

pub use text_field::{render_text_field, TextFieldState};
