mod encode_unsized;
pub use self::encode_unsized::EncodeUnsized;

mod encode;
pub use self::encode::Encode;

mod array_encoder;
pub use self::array_encoder::ArrayEncoder;

mod struct_encoder;
pub use self::struct_encoder::StructEncoder;
