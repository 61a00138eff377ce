use serde::{Deserialize, Deserializer};

/// An update to a field that tells "leave it alone" apart from "set it".
///
/// Deserialises from a present value as `Replace`; an absent field (with
/// `#[serde(default)]`) is `Keep`. An explicit `null` is rejected by the
/// inner type, so clients cannot send an ambiguous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Replace(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Keep => Patch::Keep,
            Patch::Replace(value) => Patch::Replace(f(value)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Replace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Input {
        #[serde(default)]
        ids: Patch<Vec<i32>>,
    }

    #[test]
    fn absent_field_is_keep() {
        let input: Input = serde_json::from_str("{}").unwrap();
        assert_eq!(input.ids, Patch::Keep);
    }

    #[test]
    fn empty_list_is_replace() {
        let input: Input = serde_json::from_str(r#"{"ids": []}"#).unwrap();
        assert_eq!(input.ids, Patch::Replace(vec![]));
    }

    #[test]
    fn null_is_rejected() {
        assert!(serde_json::from_str::<Input>(r#"{"ids": null}"#).is_err());
    }

    #[test]
    fn map_preserves_keep() {
        let keep: Patch<Vec<i32>> = Patch::Keep;
        assert!(keep.map(|v| v.len()).is_keep());
        assert_eq!(Patch::Replace(vec![1, 2]).map(|v| v.len()), Patch::Replace(2));
    }
}
