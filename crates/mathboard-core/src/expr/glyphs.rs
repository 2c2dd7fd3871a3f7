//! Unicode lookups shared by the terminal layout and the inline LaTeX prettifier.

pub fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        _ => return None,
    })
}

pub fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'o' => 'ₒ',
        'x' => 'ₓ',
        'i' => 'ᵢ',
        'n' => 'ₙ',
        _ => return None,
    })
}

/// Map every character through `f`, or `None` if any character has no mapping.
pub fn map_all(text: &str, f: fn(char) -> Option<char>) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    text.chars().map(f).collect()
}

/// Greek letter names and a few constants, as (name, unicode, latex command).
const NAMED: &[(&str, &str, &str)] = &[
    ("alpha", "α", "\\alpha"),
    ("beta", "β", "\\beta"),
    ("gamma", "γ", "\\gamma"),
    ("delta", "δ", "\\delta"),
    ("epsilon", "ε", "\\epsilon"),
    ("zeta", "ζ", "\\zeta"),
    ("eta", "η", "\\eta"),
    ("theta", "θ", "\\theta"),
    ("iota", "ι", "\\iota"),
    ("kappa", "κ", "\\kappa"),
    ("lambda", "λ", "\\lambda"),
    ("mu", "μ", "\\mu"),
    ("nu", "ν", "\\nu"),
    ("xi", "ξ", "\\xi"),
    ("pi", "π", "\\pi"),
    ("rho", "ρ", "\\rho"),
    ("sigma", "σ", "\\sigma"),
    ("tau", "τ", "\\tau"),
    ("upsilon", "υ", "\\upsilon"),
    ("phi", "φ", "\\phi"),
    ("chi", "χ", "\\chi"),
    ("psi", "ψ", "\\psi"),
    ("omega", "ω", "\\omega"),
    ("Gamma", "Γ", "\\Gamma"),
    ("Delta", "Δ", "\\Delta"),
    ("Theta", "Θ", "\\Theta"),
    ("Lambda", "Λ", "\\Lambda"),
    ("Xi", "Ξ", "\\Xi"),
    ("Pi", "Π", "\\Pi"),
    ("Sigma", "Σ", "\\Sigma"),
    ("Upsilon", "Υ", "\\Upsilon"),
    ("Phi", "Φ", "\\Phi"),
    ("Psi", "Ψ", "\\Psi"),
    ("Omega", "Ω", "\\Omega"),
    ("inf", "∞", "\\infty"),
    ("Infinity", "∞", "\\infty"),
    ("infty", "∞", "\\infty"),
];

/// Unicode glyph for a named symbol (`pi` -> `π`).
pub fn named_unicode(name: &str) -> Option<&'static str> {
    NAMED.iter().find(|(n, _, _)| *n == name).map(|(_, u, _)| *u)
}

/// LaTeX command for a named symbol, accepting either the ASCII name or the
/// unicode glyph itself (`pi` and `π` both give `\pi`).
pub fn named_latex(name: &str) -> Option<&'static str> {
    NAMED
        .iter()
        .find(|(n, u, _)| *n == name || *u == name)
        .map(|(_, _, l)| *l)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_all_superscript() {
        assert_eq!(map_all("12", superscript).as_deref(), Some("¹²"));
        assert_eq!(map_all("-n", superscript).as_deref(), Some("⁻ⁿ"));
        assert_eq!(map_all("ab", superscript), None);
        assert_eq!(map_all("", superscript), None);
    }

    #[test]
    fn test_named_lookup() {
        assert_eq!(named_unicode("theta"), Some("θ"));
        assert_eq!(named_latex("π"), Some("\\pi"));
        assert_eq!(named_latex("inf"), Some("\\infty"));
        assert_eq!(named_latex("x"), None);
    }
}
