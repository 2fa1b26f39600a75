pub mod conversion_model;
