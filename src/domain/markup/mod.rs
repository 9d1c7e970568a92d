//! Legacy math notation to LaTeX-annotated markdown.
//!
//! Older content was authored with HTML `<sub>`/`<sup>` tags, underscore
//! padding and raw Unicode glyphs for math. [`transform_legacy_math`] rewrites
//! that text into `$...$` inline math that a markdown+KaTeX renderer
//! understands.
//!
//! The conversion is a fixed, ordered table of text-to-text stages
//! ([`PIPELINE`]). Each stage is total: text it does not recognise passes
//! through untouched, so the transformer never fails. It is also not
//! idempotent. Feeding output back in can wrap or merge `$` delimiters again,
//! and HTML entities decoded by the last stages become live tags on the next
//! pass.

pub mod media;

use regex::{NoExpand, Regex};
use serde::Serialize;
use std::sync::LazyLock;

/// A single named step of the pipeline.
#[derive(Debug)]
pub struct Stage {
    pub name: &'static str,
    run: fn(&str) -> String,
}

impl Stage {
    pub fn apply(&self, input: &str) -> String {
        (self.run)(input)
    }
}

/// Text after one stage, as reported by [`trace_legacy_math`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutput {
    pub stage: &'static str,
    pub output: String,
}

/// Conversion stages in application order.
pub static PIPELINE: [Stage; 13] = [
    Stage { name: "dot-notation", run: dot_notation },
    Stage { name: "fractions", run: fractions },
    Stage { name: "subscripts", run: subscripts },
    Stage { name: "superscripts", run: superscripts },
    Stage { name: "underscore-cleanup", run: underscore_cleanup },
    Stage { name: "greek-letters", run: greek_letters },
    Stage { name: "operators", run: operators },
    Stage { name: "whitespace", run: collapse_whitespace },
    Stage { name: "math-mode", run: wrap_math_mode },
    Stage { name: "targeted-wrapping", run: wrap_targeted },
    Stage { name: "dollar-cleanup", run: dollar_cleanup },
    Stage { name: "html-entities", run: decode_entities },
    Stage { name: "trim", run: trim },
];

/// Converts legacy math markup into LaTeX-annotated markdown.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(transform_legacy_math("Let a<sub>x</sub> be"), "Let $a_{x}$ be");
/// assert_eq!(transform_legacy_math("α + β"), r"\alpha + \beta");
/// ```
pub fn transform_legacy_math(input: &str) -> String {
    PIPELINE
        .iter()
        .fold(input.to_string(), |text, stage| stage.apply(&text))
}

/// Runs the pipeline and records the text after every stage.
///
/// The last entry's `output` equals [`transform_legacy_math`] of the same
/// input.
pub fn trace_legacy_math(input: &str) -> Vec<StageOutput> {
    let mut text = input.to_string();
    PIPELINE
        .iter()
        .map(|stage| {
            text = stage.apply(&text);
            StageOutput {
                stage: stage.name,
                output: text.clone(),
            }
        })
        .collect()
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Applies each `(pattern, replacement)` pair in order.
fn replace_each(input: &str, rules: &[(Regex, &str)]) -> String {
    rules
        .iter()
        .fold(input.to_string(), |text, (re, rep)| {
            re.replace_all(&text, *rep).into_owned()
        })
}

/// Applies literal, case-sensitive substitutions in order.
fn replace_literals(input: &str, pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .fold(input.to_string(), |text, &(from, to)| text.replace(from, to))
}

// Replacement strings use `${n}` groups and `$$` for a literal dollar.

static DOT_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    const DOT: &str = r"$$\dot{${1}}(${2})$$";
    vec![
        (
            compile(r"_<sub>_([a-zA-Z])_</sub>_<sub>˙\(</sub>_<sub>_([a-z])_</sub>_<sub>\)</sub>"),
            DOT,
        ),
        (
            compile(r"_<sub>_([A-Z])_</sub>_<sup>˙\s*</sup><sub>\(</sub>_<sub>_([a-z])_</sub>_<sub>\)</sub>"),
            DOT,
        ),
        (
            compile(r"_<sub>_([A-Z])_</sub>_<sup>˙\s*</sup>\(_<sub>_([a-z])_</sub>_\)"),
            DOT,
        ),
    ]
});

static FRACTION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    const FRAC: &str = r"$$\frac{${1}}{${2}}$$";
    vec![
        (compile(r"_<sup>_([^<]+)_</sup><sub>_([^<]+)_</sub>"), FRAC),
        (compile(r"<sup>_?([^<]+)_?</sup><sub>_?([^<]+)_?</sub>"), FRAC),
    ]
});

static SUBSCRIPT: LazyLock<Regex> = LazyLock::new(|| compile(r"_?<sub>_?([^<]+)_?</sub>"));

static SUPERSCRIPT: LazyLock<Regex> = LazyLock::new(|| compile(r"_?<sup>_?([^<]+)_?</sup>"));

static UNDERSCORE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (compile(r"_\{_+([^}]+)_+\}"), r"_{${1}}"),
        (compile(r"\^\{_+([^}]+)_+\}"), r"^{${1}}"),
        (compile(r"_\{([^}]*)_\}"), r"_{${1}}"),
        (compile(r"\^\{([^}]*)_\}"), r"^{${1}}"),
    ]
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

static MATH_MODE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            compile(r"([^$])([a-zA-Z])\s*_\{([^}]+)\}\s*\^\{([^}]+)\}"),
            r"${1}$$${2}_{${3}}^{${4}}$$",
        ),
        (
            compile(r"([^$])([a-zA-Z])\s*_\{([^}]+)\}"),
            r"${1}$$${2}_{${3}}$$",
        ),
        (
            compile(r"([^$])([a-zA-Z])\s*\^\{([^}]+)\}"),
            r"${1}$$${2}^{${3}}$$",
        ),
    ]
});

static TARGETED_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            compile(r"([^$])\\dot\{([^}]+)\}\(([^)]+)\)\s*="),
            r"${1}$$\dot{${2}}(${3}) =$$",
        ),
        (
            compile(r"([^$])\(([A-Za-z])\s*-\s*([A-Za-z\\]+)\)"),
            r"${1}$$(${2} - ${3})$$",
        ),
    ]
});

static DOLLAR_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"\${3,}"));

static SPACED_DOLLARS: LazyLock<Regex> = LazyLock::new(|| compile(r"\$\s+\$"));

const GREEK: &[(&str, &str)] = &[
    ("α", r"\alpha"),
    ("β", r"\beta"),
    ("γ", r"\gamma"),
    ("δ", r"\delta"),
    ("ε", r"\epsilon"),
    ("θ", r"\theta"),
    ("λ", r"\lambda"),
    ("μ", r"\mu"),
    ("π", r"\pi"),
    ("σ", r"\sigma"),
    ("τ", r"\tau"),
    ("φ", r"\phi"),
    ("ϕ", r"\phi"),
    ("ω", r"\omega"),
];

const OPERATORS: &[(&str, &str)] = &[
    ("×", r"\times"),
    ("≈", r"\approx"),
    ("→", r"\rightarrow"),
    ("≤", r"\leq"),
    ("≥", r"\geq"),
    ("−", "-"),
];

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// `_<sub>_x_</sub>_<sub>˙(</sub>...` shapes → `$\dot{x}(t)$`.
fn dot_notation(input: &str) -> String {
    replace_each(input, &DOT_RULES)
}

/// Adjacent `<sup>n</sup><sub>d</sub>` → `$\frac{n}{d}$`.
fn fractions(input: &str) -> String {
    replace_each(input, &FRACTION_RULES)
}

/// Remaining `<sub>x</sub>` → `_{x}`. Underscore padding inside the tag may
/// survive into the braces and is handled by [`underscore_cleanup`].
fn subscripts(input: &str) -> String {
    SUBSCRIPT.replace_all(input, r"_{${1}}").into_owned()
}

fn superscripts(input: &str) -> String {
    SUPERSCRIPT.replace_all(input, r"^{${1}}").into_owned()
}

/// Strips underscore padding left inside `_{...}` and `^{...}`.
fn underscore_cleanup(input: &str) -> String {
    replace_each(input, &UNDERSCORE_RULES)
}

fn greek_letters(input: &str) -> String {
    replace_literals(input, GREEK)
}

fn operators(input: &str) -> String {
    replace_literals(input, OPERATORS)
}

fn collapse_whitespace(input: &str) -> String {
    WHITESPACE.replace_all(input, " ").into_owned()
}

/// Wraps `x_{..}^{..}`, `x_{..}` and `x^{..}` in `$...$` unless the letter
/// is already preceded by `$`. A letter at the very start of the text has no
/// preceding character and is left bare.
fn wrap_math_mode(input: &str) -> String {
    replace_each(input, &MATH_MODE_RULES)
}

/// Wraps `\dot{X}(Y) =` and `(a - b)` in `$...$`.
fn wrap_targeted(input: &str) -> String {
    replace_each(input, &TARGETED_RULES)
}

/// Collapses runs of three or more `$` and `$ $` pairs into `$$`.
fn dollar_cleanup(input: &str) -> String {
    let collapsed = DOLLAR_RUN.replace_all(input, NoExpand("$$"));
    SPACED_DOLLARS
        .replace_all(&collapsed, NoExpand("$$"))
        .into_owned()
}

fn decode_entities(input: &str) -> String {
    replace_literals(input, ENTITIES)
}

fn trim(input: &str) -> String {
    input.trim().to_string()
}
