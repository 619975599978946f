use serde_json::{Value, json};

use crate::*;

#[test]
fn field_order_and_nulls() {
    let (term, _) = Term::pro_forma("EM[UNIMOD:35]EVEES[UNIMOD:56]PEK").unwrap();
    let value = term.to_json_value().unwrap();
    assert_eq!(
        value.as_object().unwrap().keys().collect::<Vec<_>>(),
        [
            "Sequence",
            "GlobalModifications",
            "NTerminalDescriptors",
            "CTerminalDescriptors",
            "LabileDescriptors",
            "Tags",
            "UnlocalizedTags",
            "TagGroups"
        ]
    );
    assert_eq!(value["Sequence"], "EMEVEESPEK");
    assert_eq!(value["GlobalModifications"], Value::Null);
    assert_eq!(value["TagGroups"], Value::Null);
    assert_eq!(
        value["Tags"][0],
        json!({
            "ZeroBasedStartIndex": 1,
            "ZeroBasedEndIndex": 1,
            "Descriptors": [{"Key": "Identifier", "EvidenceType": "Unimod", "Value": "UNIMOD:35"}]
        })
    );
}

#[test]
fn tag_groups() {
    let (term, _) = Term::pro_forma("EMK[XLMOD:02001#XL1]SESPEK[#XL1(0.5)]").unwrap();
    let value = term.to_json_value().unwrap();
    assert_eq!(
        value["TagGroups"],
        json!([{
            "Name": "XL1",
            "Key": "Identifier",
            "EvidenceType": "XlMod",
            "Value": "XLMOD:02001",
            "Members": [
                {"ZeroBasedStartIndex": 2, "ZeroBasedEndIndex": 2, "Weight": 0.0},
                {"ZeroBasedStartIndex": 8, "ZeroBasedEndIndex": 8, "Weight": 0.5}
            ],
            "KeyFlux": "Identifier",
            "EvidenceFlux": "XlMod",
            "ValueFlux": "XLMOD:02001"
        }])
    );
    assert_eq!(value["Tags"], Value::Null);
}

#[test]
fn fixed_groups_have_no_flux() {
    let term = Term::new("AC").tag_group_with(TagGroup::fixed(
        "g1",
        Descriptor::mass("+1"),
        [MembershipDescriptor::new(1, 0.0)],
    ));
    let value = term.to_json_value().unwrap();
    assert!(value["TagGroups"][0].get("KeyFlux").is_none());
    assert_eq!(value["TagGroups"][0]["Key"], "Mass");
}

#[test]
fn everything() {
    let (term, _) =
        Term::pro_forma("<[Oxidation]@M,C>{Glycan:Hex}[Phospho]^2?[Acetyl]-EM-[Amidated]").unwrap();
    let text = term.to_json().unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value["GlobalModifications"],
        json!([{
            "Descriptors": [{"Key": "Name", "EvidenceType": "None", "Value": "Oxidation"}],
            "Targets": ["M", "C"]
        }])
    );
    assert_eq!(
        value["UnlocalizedTags"],
        json!([{
            "Count": 2,
            "Descriptors": [{"Key": "Name", "EvidenceType": "None", "Value": "Phospho"}]
        }])
    );
    assert_eq!(value["LabileDescriptors"][0]["Key"], "Glycan");
    assert_eq!(value["NTerminalDescriptors"][0]["Value"], "Acetyl");
    assert_eq!(value["CTerminalDescriptors"][0]["Value"], "Amidated");
}

#[test]
fn model_round_trip() {
    let tag = Tag::ranged(1, 3, [Descriptor::mass("+1")]);
    let text = serde_json::to_string(&tag).unwrap();
    assert_eq!(serde_json::from_str::<Tag>(&text).unwrap(), tag);
    let empty: Tag = serde_json::from_str(
        r#"{"ZeroBasedStartIndex":0,"ZeroBasedEndIndex":0,"Descriptors":null}"#,
    )
    .unwrap();
    assert!(empty.descriptors.is_empty());
}
