//! Default value literals through the public property API.

use rstest::rstest;
use uht::property::{
    BoolProperty, NumericKind, NumericProperty, Property, PropertyKind, PropertySettings, StringKind,
    StringProperty, StructProperty, TypeRef,
};
use uht::types::TypeArena;

fn scalar(keyword: &str) -> Property {
    let kind = match keyword {
        "bool" => PropertyKind::Bool(BoolProperty::native()),
        "FName" => PropertyKind::String(StringProperty::new(StringKind::Name)),
        "FString" => PropertyKind::String(StringProperty::new(StringKind::String)),
        "FText" => PropertyKind::String(StringProperty::new(StringKind::Text)),
        other => {
            let numeric = NumericKind::from_keyword(other).unwrap_or_else(|| panic!("unknown keyword '{other}'"));
            PropertyKind::Numeric(NumericProperty::new(numeric))
        }
    };
    Property::new(PropertySettings::member("Value"), kind)
}

fn struct_named(name: &str) -> Property {
    Property::new(
        PropertySettings::member("Value"),
        PropertyKind::Struct(StructProperty::new(TypeRef::named(name))),
    )
}

#[rstest]
#[case("bool", " true ", "true")]
#[case("bool", "false", "false")]
#[case("int32", "0x10", "16")]
#[case("int32", "-42", "-42")]
#[case("uint8", "255", "255")]
#[case("int64", "-9223372036854775808", "-9223372036854775808")]
#[case("uint64", "18446744073709551615", "18446744073709551615")]
#[case("float", "1.5f", "1.500000")]
#[case("float", "2", "2.000000")]
#[case("double", "-0.25", "-0.250000")]
#[case("FName", "NAME_None", "\"None\"")]
#[case("FName", "FName(TEXT(\"Idle\"))", "\"Idle\"")]
#[case("FString", "FString()", "\"\"")]
#[case("FString", "TEXT(\"abc\")", "\"abc\"")]
#[case("FText", "FText()", "FText::GetEmpty()")]
#[case("FText", "INVTEXT(\"Hi\")", "INVTEXT(\"Hi\")")]
#[case("FText", "NSLOCTEXT(\"ns\",\"key\",\"Hello\")", "NSLOCTEXT(\"ns\", \"key\", \"Hello\")")]
fn test_scalar_default_is_canonical_and_stable(#[case] keyword: &str, #[case] literal: &str, #[case] expected: &str) {
    let types = TypeArena::new();
    let property = scalar(keyword);
    let canonical = property.sanitize_default_value(&types, literal);
    assert_eq!(canonical.as_deref(), Some(expected));
    // Sanitizing the canonical form gives it back unchanged.
    assert_eq!(property.sanitize_default_value(&types, expected).as_deref(), Some(expected));
}

#[rstest]
#[case("bool", "1")]
#[case("bool", "TRUE")]
#[case("int32", "2147483648")]
#[case("int32", "1.5")]
#[case("uint8", "-1")]
#[case("float", "abc")]
#[case("float", "1e39")]
#[case("double", "1e400")]
#[case("double", "")]
#[case("FName", "Idle")]
#[case("FString", "\"a\" \"b\"")]
#[case("FText", "LOCTEXT(\"key\", \"Hello\")")]
fn test_malformed_scalar_default_rejected(#[case] keyword: &str, #[case] literal: &str) {
    assert_eq!(scalar(keyword).sanitize_default_value(&TypeArena::new(), literal), None);
}

#[rstest]
#[case("FVector", "FVector(1, 2, 3)", Some("1.000000,2.000000,3.000000"))]
#[case("FVector", "FVector::ZeroVector", Some("0.000000,0.000000,0.000000"))]
#[case("FRotator", "FRotator(90)", Some("90.000000,90.000000,90.000000"))]
#[case("FColor", "FColor(10, 20, 30, 40)", Some("(R=10,G=20,B=30,A=40)"))]
#[case("FLinearColor", "FLinearColor::White", Some("(R=1.000000,G=1.000000,B=1.000000,A=1.000000)"))]
#[case("FVector2D", "FVector2D(1, 2)", Some("(X=1.000,Y=2.000)"))]
#[case("FInventory", "FInventory()", Some("()"))]
#[case("FInventory", "FInventory(3)", None)]
#[case("FVector", "FVector(1, 2)", None)]
fn test_struct_defaults(#[case] name: &str, #[case] literal: &str, #[case] expected: Option<&str>) {
    let types = TypeArena::new();
    let property = struct_named(name);
    let canonical = property.sanitize_default_value(&types, literal);
    assert_eq!(canonical.as_deref(), expected);
    if let Some(canonical) = canonical {
        assert_eq!(property.sanitize_default_value(&types, &canonical), Some(canonical));
    }
}
