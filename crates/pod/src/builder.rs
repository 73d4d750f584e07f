//! Helper types for building POD objects.

mod builder;
#[doc(inline)]
pub use self::builder::Builder;

mod array_builder;
pub use self::array_builder::ArrayBuilder;

mod struct_builder;
pub use self::struct_builder::StructBuilder;

mod object_builder;
pub use self::object_builder::ObjectBuilder;

mod sequence_builder;
pub use self::sequence_builder::SequenceBuilder;

mod choice_builder;
pub use self::choice_builder::ChoiceBuilder;
