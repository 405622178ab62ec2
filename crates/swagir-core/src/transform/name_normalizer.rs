use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::config::EnumMemberStyle;
use crate::ir::NormalizedName;

/// Below this, a fractional remainder is treated as zero when encoding
/// numeric enum members.
const FRACTION_EPSILON: f64 = 0.000001;

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let words = split_words(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: words.to_pascal_case(),
        camel_case: words.to_lower_camel_case(),
        snake_case: words.to_snake_case(),
        screaming_snake: words.to_shouty_snake_case(),
    }
}

/// Strip `_`, `-` and space separators and capitalize the letter after
/// each one, and the first letter. Other characters are kept as-is.
///
/// `created-at` → `CreatedAt`, `v1ApiKey` → `V1ApiKey`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut capitalize_next = true;
    for ch in input.chars() {
        if matches!(ch, '_' | '-' | ' ') {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Like [`title_case`], but the first letter is lower-cased.
///
/// `_abc__def` → `abcDef`, `AbcDef` → `abcDef`.
pub fn camel_case(input: &str) -> String {
    lower_first(&title_case(input))
}

/// Capitalize the first letter and every letter after a `-` or `_`.
/// Leading separators and every `-` are dropped; inner `_` are kept.
///
/// `abc_def` → `Abc_Def`, `-_abc-def` → `AbcDef`.
pub fn class_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut seen_first = false;
    let mut capitalize_next = false;
    for ch in input.chars() {
        if !seen_first {
            if ch != '_' && ch != '-' {
                out.extend(ch.to_uppercase());
                seen_first = true;
            }
            continue;
        }
        match ch {
            '-' => capitalize_next = true,
            '_' => {
                out.push(ch);
                capitalize_next = true;
            }
            _ if capitalize_next => {
                out.extend(ch.to_uppercase());
                capitalize_next = false;
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Member identifier for a string enum literal.
///
/// Distinct literals may map to the same identifier (`a-b` and `ab` in
/// verbatim mode); no collision check is made here.
pub fn enum_member_name(literal: &str, style: EnumMemberStyle) -> String {
    match style {
        EnumMemberStyle::Verbatim => sanitize_identifier(literal),
        EnumMemberStyle::ClassName => sanitize_identifier(&class_name(literal)),
    }
}

/// Member identifier for a numeric enum literal.
///
/// `0.125` → `NUMBER_0_DOT_125`, `-122.1109` → `NUMBER_NEG_122_DOT_1109`.
/// Exact zero loses its sign. Fraction digits are produced until the
/// remainder drops to the epsilon, which bounds values like 1/3.
pub fn float_to_enum_member(value: f64) -> String {
    let mut out = String::from("NUMBER_");
    let mut value = value;
    if value < 0.0 {
        value = value.abs();
        out.push_str("NEG_");
    }

    let whole = value.floor();
    out.push_str(&(whole as u64).to_string());

    let mut remaining = value - whole;
    if remaining <= FRACTION_EPSILON {
        return out;
    }

    out.push_str("_DOT_");
    while remaining > FRACTION_EPSILON {
        remaining *= 10.0;
        let digit = remaining.floor();
        out.push_str(&(digit as u8).to_string());
        remaining -= digit;
    }
    out
}

fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace runs of non-alphanumeric characters with a single `_` so heck
/// sees word boundaries. A leading digit gets a `_` prefix.
fn split_words(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

/// Keep `[A-Za-z0-9_]`, prefix a leading digit with `_`.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if result.is_empty() && ch.is_ascii_digit() {
                result.push('_');
            }
            result.push(ch);
        }
    }

    if result.is_empty() {
        return "Unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        let cases = [
            ("abcDef", "AbcDef"),
            ("AbcDef", "AbcDef"),
            ("created-at", "CreatedAt"),
            ("abc_def ghi", "AbcDefGhi"),
            ("__x", "X"),
            ("v1ApiKey", "V1ApiKey"),
            ("", ""),
        ];
        for (input, want) in cases {
            assert_eq!(title_case(input), want, "input {input:?}");
        }
    }

    #[test]
    fn test_camel_case() {
        let cases = [
            ("AbcDef", "abcDef"),
            ("abcDef", "abcDef"),
            ("abc_def", "abcDef"),
            ("_abc__def", "abcDef"),
            ("-abc--def", "abcDef"),
            ("", ""),
        ];
        for (input, want) in cases {
            assert_eq!(camel_case(input), want, "input {input:?}");
        }
    }

    #[test]
    fn test_class_name() {
        let cases = [
            ("abcDef", "AbcDef"),
            ("abc_def", "Abc_Def"),
            ("abc__def", "Abc__Def"),
            ("AbcDef", "AbcDef"),
            ("-_abc-def", "AbcDef"),
            ("", ""),
        ];
        for (input, want) in cases {
            assert_eq!(class_name(input), want, "input {input:?}");
        }
    }

    #[test]
    fn test_enum_member_verbatim() {
        assert_eq!(enum_member_name("V_PUBLIC", EnumMemberStyle::Verbatim), "V_PUBLIC");
        assert_eq!(enum_member_name("a-b.c", EnumMemberStyle::Verbatim), "abc");
        assert_eq!(enum_member_name("1st", EnumMemberStyle::Verbatim), "_1st");
        assert_eq!(enum_member_name("!!", EnumMemberStyle::Verbatim), "Unnamed");
    }

    #[test]
    fn test_enum_member_class_name() {
        assert_eq!(enum_member_name("in-progress", EnumMemberStyle::ClassName), "InProgress");
        assert_eq!(enum_member_name("v1.beta", EnumMemberStyle::ClassName), "V1beta");
        assert_eq!(enum_member_name("done_ok", EnumMemberStyle::ClassName), "Done_Ok");
    }

    #[test]
    fn test_enum_member_collision_is_silent() {
        let a = enum_member_name("a-b", EnumMemberStyle::Verbatim);
        let b = enum_member_name("ab", EnumMemberStyle::Verbatim);
        assert_eq!(a, b);
    }

    #[test]
    fn test_float_members() {
        assert_eq!(float_to_enum_member(0.125), "NUMBER_0_DOT_125");
        assert_eq!(float_to_enum_member(-122.1109), "NUMBER_NEG_122_DOT_1109");
        assert_eq!(float_to_enum_member(0.0), "NUMBER_0");
        assert_eq!(float_to_enum_member(-0.0), "NUMBER_0");
        assert_eq!(float_to_enum_member(1.09), "NUMBER_1_DOT_09");
        assert_eq!(float_to_enum_member(8.0), "NUMBER_8");
    }

    #[test]
    fn test_float_members_terminate_on_repeating_fractions() {
        let third = float_to_enum_member(1.0 / 3.0);
        assert!(third.starts_with("NUMBER_0_DOT_333333"));
        assert!(third.len() < 64, "{third}");

        // Non-finite input still yields an identifier.
        assert!(float_to_enum_member(f64::NAN).starts_with("NUMBER_"));
        assert!(float_to_enum_member(f64::INFINITY).starts_with("NUMBER_"));
    }

    #[test]
    fn test_fixture_enum_members() {
        let values = [
            0.125, 0.25, 0.5, 0.0, 1.0, 1.5, 2.0, 4.0, 8.0, 122.1109, -0.125, -0.25, -0.5, -0.0,
            -1.0, -1.5, -2.0, -4.0, -8.0, -122.1109, 1.09,
        ];
        let members: Vec<String> = values.iter().map(|v| float_to_enum_member(*v)).collect();
        insta::assert_snapshot!(members.join("\n"), @r"
        NUMBER_0_DOT_125
        NUMBER_0_DOT_25
        NUMBER_0_DOT_5
        NUMBER_0
        NUMBER_1
        NUMBER_1_DOT_5
        NUMBER_2
        NUMBER_4
        NUMBER_8
        NUMBER_122_DOT_1109
        NUMBER_NEG_0_DOT_125
        NUMBER_NEG_0_DOT_25
        NUMBER_NEG_0_DOT_5
        NUMBER_0
        NUMBER_NEG_1
        NUMBER_NEG_1_DOT_5
        NUMBER_NEG_2
        NUMBER_NEG_4
        NUMBER_NEG_8
        NUMBER_NEG_122_DOT_1109
        NUMBER_1_DOT_09
        ");
    }

    #[test]
    fn test_normalize_name() {
        let n = normalize_name("DevKeyService_GetDevKey");
        assert_eq!(n.pascal_case, "DevKeyServiceGetDevKey");
        assert_eq!(n.camel_case, "devKeyServiceGetDevKey");
        assert_eq!(n.snake_case, "dev_key_service_get_dev_key");
        assert_eq!(n.screaming_snake, "DEV_KEY_SERVICE_GET_DEV_KEY");
    }

    #[test]
    fn test_normalize_path_like_name() {
        let n = normalize_name("/pets/{petId}");
        assert_eq!(n.pascal_case, "PetsPetId");
        assert_eq!(n.snake_case, "pets_pet_id");
    }
}
