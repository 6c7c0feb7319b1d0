pub mod product_form;
pub mod session;

pub use product_form::{ImageUpload, ProductForm};
pub use session::AdminSession;
