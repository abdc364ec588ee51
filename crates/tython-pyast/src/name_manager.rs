//! Synthesizes the identifiers the transformer needs but the source text
//! never spelled out: names for anonymous callbacks, and scratch
//! temporaries for destructuring and the tuple-binder `for` forms.

/// Hands out fresh identifiers for one file's translation and normalizes
/// identifiers to snake_case when the caller asks for it.
///
/// A new `NameManager` is constructed per file (see the data model's
/// "Lifecycles" note), so the counters below never leak across files.
#[derive(Debug, Default)]
pub struct NameManager {
    callback_counter: u32,
    tmp_counter: u32,
    convert_snake_case: bool,
}

impl NameManager {
    pub fn new(convert_snake_case: bool) -> Self {
        Self {
            callback_counter: 0,
            tmp_counter: 0,
            convert_snake_case,
        }
    }

    /// Synthetic name for an anonymous function expression, e.g. the
    /// callback passed to `.then(...)`. Matches the original's
    /// `callback_<n>` naming.
    pub fn fresh_callback_name(&mut self) -> String {
        let name = format!("callback_{}", self.callback_counter);
        self.callback_counter += 1;
        name
    }

    /// Synthetic name for the defensive copy taken before popping
    /// destructured elements off an array or object (`tmp_cp_<n>` in the
    /// original).
    pub fn fresh_tmp_cp(&mut self) -> String {
        let name = format!("tmp_cp_{}", self.tmp_counter);
        self.tmp_counter += 1;
        name
    }

    /// Synthetic name for the per-iteration temporary a tuple-binder
    /// `for...of`/`for...in` loop unpacks before assigning into the real
    /// destructured targets (`iter_item_<n>` in the original).
    pub fn fresh_iter_item(&mut self) -> String {
        let name = format!("iter_item_{}", self.tmp_counter);
        self.tmp_counter += 1;
        name
    }

    /// The `__definition_of__<name>` marker the hoist registry uses as a
    /// synthetic Name standing in for a hoisted `FunctionDef`. The
    /// post-processor strips the marker back out (see §4.9).
    pub fn definition_marker(name: &str) -> String {
        format!("__definition_of__{name}")
    }

    /// Applies the configured identifier policy: snake_case if requested,
    /// otherwise the identifier is returned unchanged. Idempotent —
    /// `apply(apply(x)) == apply(x)` — because `to_snake_case` only ever
    /// inserts underscores before a capital that isn't already preceded by
    /// one, and running it twice finds nothing left to insert.
    pub fn apply(&self, identifier: &str) -> String {
        if self.convert_snake_case {
            to_snake_case(identifier)
        } else {
            identifier.to_string()
        }
    }
}

/// Converts `camelCase`/`PascalCase` identifiers to `snake_case`.
///
/// Grounded on `to_snake_case` in the original `helpers.py`: insert an
/// underscore before every uppercase letter that isn't already at the start
/// of the string or preceded by an underscore, then lowercase everything.
pub fn to_snake_case(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    for (i, ch) in identifier.chars().enumerate() {
        if ch.is_uppercase() && i != 0 && !out.ends_with('_') {
            out.push('_');
        }
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_is_idempotent() {
        for id in ["camelCase", "PascalCase", "already_snake", "XMLParser", "id"] {
            let once = to_snake_case(id);
            let twice = to_snake_case(&once);
            assert_eq!(once, twice, "not idempotent for {id}");
        }
    }

    #[test]
    fn snake_case_known_values() {
        assert_eq!(to_snake_case("camelCase"), "camel_case");
        assert_eq!(to_snake_case("getUserById"), "get_user_by_id");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn fresh_names_do_not_repeat() {
        let mut names = NameManager::new(false);
        let a = names.fresh_callback_name();
        let b = names.fresh_callback_name();
        assert_ne!(a, b);
    }

    #[test]
    fn apply_respects_policy() {
        let on = NameManager::new(true);
        let off = NameManager::new(false);
        assert_eq!(on.apply("getUser"), "get_user");
        assert_eq!(off.apply("getUser"), "getUser");
    }
}
