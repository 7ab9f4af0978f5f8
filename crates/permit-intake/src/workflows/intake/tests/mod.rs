mod common;
mod mapping;
mod rendering;
