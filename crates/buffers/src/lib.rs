//! msgpackpp-buffers - byte buffers used by the msgpackpp encoder.

mod writer;

pub use writer::Writer;
