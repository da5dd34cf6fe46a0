mod hash;

pub use self::hash::*;
