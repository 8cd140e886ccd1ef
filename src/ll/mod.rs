pub mod record;
pub mod slots;
