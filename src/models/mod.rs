pub mod did;
pub mod medical_data;
