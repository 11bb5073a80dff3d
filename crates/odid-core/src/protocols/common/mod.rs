pub(crate) mod reader;

pub(crate) use reader::padded_ascii;
