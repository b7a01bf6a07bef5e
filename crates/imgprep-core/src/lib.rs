pub mod compress;
pub mod consts;
pub mod cropper;
pub mod error;
pub mod file;
pub mod geometry;
pub mod pipeline;
pub mod widget;
pub mod worker;
