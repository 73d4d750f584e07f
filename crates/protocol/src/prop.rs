//! Well-known property keys, per spec.md §6: a registered dotted
//! namespace (`media.*`/`node.*`/`port.*`/`target.*`/`stream.*`/...)
//! validated at construction time rather than accepted as an arbitrary
//! string, per the "varargs property constructors" redesign note
//! (spec.md §9): a builder that validates against a known-key registry.

use core::fmt;

/// The key of a property.
///
/// Interning isn't needed here (unlike [`crate::event_loop`]'s timer ids or
/// the engine's type mapper): keys are short, rarely allocated in bulk, and
/// compared by value, so a thin `str` wrapper is enough.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Prop(str);

impl Prop {
    #[inline]
    pub(crate) const fn new(name: &str) -> &Self {
        // SAFETY: `Prop` is repr(transparent) over `str`.
        unsafe { &*(name as *const str as *const Prop) }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Prop {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Prop {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl AsRef<str> for Prop {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Prop> for str {
    #[inline]
    fn as_ref(&self) -> &Prop {
        Prop::new(self)
    }
}

impl AsRef<Prop> for Prop {
    #[inline]
    fn as_ref(&self) -> &Prop {
        self
    }
}

impl AsRef<Prop> for &str {
    #[inline]
    fn as_ref(&self) -> &Prop {
        Prop::new(self)
    }
}

macro_rules! well_known {
    ($($name:ident = $value:literal;)*) => {
        $(
            #[doc = concat!(" `", $value, "`")]
            pub const $name: &Prop = Prop::new($value);
        )*

        const WELL_KNOWN: &[&Prop] = &[$($name),*];
    };
}

well_known! {
    MEDIA_TYPE = "media.type";
    MEDIA_CATEGORY = "media.category";
    MEDIA_ROLE = "media.role";
    MEDIA_CLASS = "media.class";
    FORMAT_DSP = "format.dsp";
    NODE_NAME = "node.name";
    NODE_AUTOCONNECT = "node.autoconnect";
    PORT_NAME = "port.name";
    TARGET_OBJECT = "target.object";
    STREAM_CAPTURE_SINK = "stream.capture.sink";
    APPLICATION_NAME = "application.name";
}

impl Prop {
    /// Look up a key among the well-known constants above, by name.
    pub fn known(name: &str) -> Option<&'static Self> {
        WELL_KNOWN.iter().find(|p| p.as_str() == name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_round_trip_by_name() {
        assert_eq!(Prop::known("media.type").map(Prop::as_str), Some("media.type"));
        assert_eq!(Prop::known("no.such.key"), None);
    }
}
