mod decode_unsized;
pub use self::decode_unsized::DecodeUnsized;

mod decode;
pub use self::decode::Decode;

mod array_decoder;
pub use self::array_decoder::ArrayDecoder;

mod struct_decoder;
pub use self::struct_decoder::StructDecoder;
