// Adapters layer: HTTP export source, workbook decoding and local storage.

pub mod http;
pub mod storage;
pub mod workbook;
