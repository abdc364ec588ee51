//! The post-processor: a fixed ordered list of literal textual
//! substitutions applied to the serializer's output (spec.md §4.9). This
//! is the compatibility shim between the two ecosystems — `console.log`
//! becomes `print`, `JSON.stringify` becomes `json.dumps`, and so on.
//!
//! Context-free and textual by design (spec.md §9 Open Question (a)): a
//! substitution can corrupt a string literal that happens to contain the
//! search text (e.g. a string containing the literal substring
//! `"console.log"`). This is accepted as a known limitation, matching the
//! original.

/// One row of the substitution table: `find` is replaced with `replace`
/// everywhere it occurs, literally (no regex, no word boundaries).
pub struct Substitution {
    pub find: &'static str,
    pub replace: &'static str,
}

/// The table from spec.md §4.9, reproduced in the exact row order the
/// spec gives — order matters because later rows can see the result of
/// earlier ones (e.g. `null`/`undefined` run after `_this`/`this`, so a
/// variable named `this` does not collide with `null`'s pass).
pub const SUBSTITUTIONS: &[Substitution] = &[
    Substitution { find: "console.log", replace: "print" },
    Substitution { find: "console.error", replace: "print" },
    Substitution { find: "Error(", replace: "Exception(" },
    Substitution { find: "true", replace: "True" },
    Substitution { find: "false", replace: "False" },
    Substitution { find: "JSON.stringify", replace: "json.dumps" },
    Substitution { find: "JSON.parse", replace: "json.loads" },
    Substitution { find: "const _this = this;", replace: "" },
    Substitution { find: "_this", replace: "self" },
    Substitution { find: "this", replace: "self" },
    Substitution { find: " Set", replace: " set" },
    Substitution { find: " Map", replace: " dict" },
    Substitution { find: "toLowerCase", replace: "lower" },
    Substitution { find: "toUpperCase", replace: "upper" },
    Substitution { find: ".push(", replace: ".append(" },
    Substitution { find: ".indexOf(", replace: ".index(" },
    Substitution { find: "Array.from", replace: "list" },
    Substitution { find: "\"null\"", replace: "None" },
    Substitution { find: "\"undefined\"", replace: "None" },
    Substitution { find: "null", replace: "None" },
    Substitution { find: "undefined", replace: "None" },
    Substitution { find: "self = self", replace: "" },
    Substitution { find: "__definition_of__", replace: "" },
    Substitution { find: "@property()", replace: "@property" },
    Substitution { find: ".entries()", replace: ".items()" },
    Substitution { find: "${", replace: "{" },
];

/// Applies every substitution in [`SUBSTITUTIONS`], in order, to `source`.
pub fn postprocess(source: &str) -> String {
    let mut text = source.to_string();
    for sub in SUBSTITUTIONS {
        if sub.find.is_empty() {
            continue;
        }
        text = text.replace(sub.find, sub.replace);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_typeof_strict_eq_and_this_rewriting() {
        let serialized = "if type(this.x) == 'number':\n    pass\nelse:\n    pass\n";
        assert_eq!(
            postprocess(serialized),
            "if type(self.x) == 'number':\n    pass\nelse:\n    pass\n"
        );
    }

    #[test]
    fn console_log_becomes_print() {
        assert_eq!(postprocess("console.log(x)\n"), "print(x)\n");
    }

    #[test]
    fn error_constructor_becomes_exception() {
        assert_eq!(postprocess("raise Error('boom')\n"), "raise Exception('boom')\n");
    }

    #[test]
    fn json_bridge_functions() {
        assert_eq!(postprocess("JSON.stringify(x)"), "json.dumps(x)");
        assert_eq!(postprocess("JSON.parse(x)"), "json.loads(x)");
    }

    #[test]
    fn hoist_marker_prefix_is_stripped() {
        assert_eq!(postprocess("def __definition_of__callback_0():\n    pass\n"), "def callback_0():\n    pass\n");
    }

    #[test]
    fn property_decorator_call_is_stripped_to_bare_decorator() {
        assert_eq!(postprocess("@property()\ndef x(self):\n    return self._x\n"), "@property\ndef x(self):\n    return self._x\n");
    }

    #[test]
    fn template_interpolation_braces() {
        assert_eq!(postprocess("f'hello ${name}'"), "f'hello {name}'");
    }

    #[test]
    fn array_and_string_method_renames() {
        assert_eq!(postprocess("xs.push(1)"), "xs.append(1)");
        assert_eq!(postprocess("xs.indexOf(1)"), "xs.index(1)");
        assert_eq!(postprocess("s.toLowerCase()"), "s.lower()");
        assert_eq!(postprocess("s.toUpperCase()"), "s.upper()");
        assert_eq!(postprocess("d.entries()"), "d.items()");
    }

    #[test]
    fn set_and_map_builtin_renames_require_leading_space() {
        assert_eq!(postprocess("x = Set()"), "x = set()");
        assert_eq!(postprocess("x = Map()"), "x = dict()");
    }

    #[test]
    fn null_and_undefined_collapse_to_none() {
        assert_eq!(postprocess("x = null"), "x = None");
        assert_eq!(postprocess("x = undefined"), "x = None");
        assert_eq!(postprocess("x = \"null\""), "x = None");
    }

    #[test]
    fn ordering_matters_for_string_literal_collisions() {
        // Known limitation (spec.md §9 Open Question (a)): a string that
        // happens to contain one of the search terms is rewritten too.
        let s = "x = 'this is a console.log test'";
        let out = postprocess(s);
        assert!(out.contains("print"));
        assert!(out.contains("self is a"));
    }
}
