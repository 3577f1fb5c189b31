pub mod extract;
pub mod save;
pub mod translate;

pub use extract::handle_object_finalized_push;
pub use save::handle_translation_result_push;
pub use translate::handle_translation_push;
