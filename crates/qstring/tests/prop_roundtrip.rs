/// Property-based tests for the query codec.
///
/// Uses `proptest` to check, over generated records and inputs:
/// - `unmarshal(marshal(r)) == r` for flat records of every field type
/// - decode-then-encode reproduces the input for directly keyed fields
/// - an empty declaration always resolves to the lower-cased field name
/// - a sequence with one bad element fails and leaves the field untouched
/// - `omitempty` zero values never reach the output
use proptest::prelude::*;
use qstring::tag::resolve;
use qstring::{marshal, unmarshal, Query, QueryError, QueryValues};

#[derive(Query, Default, Debug, Clone, PartialEq)]
pub struct Flat {
    pub text: String,
    pub flag: bool,
    pub small: i8,
    pub signed: i64,
    pub unsigned: u32,
    pub float: f64,
    pub words: Vec<String>,
    pub numbers: Vec<u16>,
}

#[derive(Query, Default, Debug, Clone, PartialEq)]
pub struct Sparse {
    #[qstring("t,omitempty")]
    pub text: String,
    #[qstring("n,omitempty")]
    pub number: i32,
    #[qstring("b,omitempty")]
    pub flag: bool,
    #[qstring("l,omitempty")]
    pub list: Vec<u8>,
}

/// Floats that are finite and not negative zero, so equality is meaningful.
fn arb_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000_000i64..1_000_000i64).prop_map(|n| n as f64),
        (-1_000_000i64..1_000_000i64).prop_map(|n| n as f64 / 1000.0),
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
    ]
    .prop_filter("no negative zero", |f| !(*f == 0.0 && f.is_sign_negative()))
}

fn arb_flat() -> impl Strategy<Value = Flat> {
    (
        ".{0,20}",
        any::<bool>(),
        any::<i8>(),
        any::<i64>(),
        any::<u32>(),
        arb_float(),
        prop::collection::vec(".{0,8}", 0..5),
        prop::collection::vec(any::<u16>(), 0..5),
    )
        .prop_map(
            |(text, flag, small, signed, unsigned, float, words, numbers)| Flat {
                text,
                flag,
                small,
                signed,
                unsigned,
                float,
                words,
                numbers,
            },
        )
}

proptest! {
    #[test]
    fn marshal_then_unmarshal_is_identity(record in arb_flat()) {
        let values = marshal(&record).unwrap();
        let mut decoded = Flat::default();
        unmarshal(&values, &mut decoded).unwrap();
        prop_assert_eq!(decoded, record);
    }

    #[test]
    fn marshal_string_then_parse_is_identity(record in arb_flat()) {
        let rendered = qstring::marshal_string(&record).unwrap();
        let mut decoded = Flat::default();
        unmarshal(&QueryValues::parse(&rendered), &mut decoded).unwrap();
        // Empty sequences render to nothing, so they decode as untouched defaults.
        prop_assert_eq!(decoded, record);
    }

    #[test]
    fn unmarshal_then_marshal_reproduces_input(
        text in ".{0,10}",
        numbers in prop::collection::vec(any::<u16>(), 0..6),
        signed in any::<i64>(),
    ) {
        let mut input = QueryValues::new();
        input.set("text", text);
        input.insert("numbers", numbers.iter().map(u16::to_string).collect());
        input.set("signed", signed.to_string());

        let mut record = Flat::default();
        unmarshal(&input, &mut record).unwrap();
        let output = marshal(&record).unwrap();
        for key in ["text", "numbers", "signed"] {
            prop_assert_eq!(output.get_all(key), input.get_all(key));
        }
    }

    #[test]
    fn empty_declaration_lowercases(name in "[A-Za-z_][A-Za-z0-9_]{0,15}") {
        let tag = resolve("", &name);
        prop_assert_eq!(tag.key, name.to_lowercase());
        prop_assert!(!tag.skip);
    }

    #[test]
    fn bad_sequence_element_discards_whole_sequence(
        good in prop::collection::vec(any::<u16>(), 0..6),
        position in 0usize..6,
        bad in "[a-z]{1,4}",
    ) {
        let mut raw: Vec<String> = good.iter().map(u16::to_string).collect();
        let position = position.min(raw.len());
        raw.insert(position, bad);

        let mut input = QueryValues::new();
        input.insert("numbers", raw);

        let mut record = Flat { numbers: vec![42], ..Default::default() };
        let err = unmarshal(&input, &mut record).unwrap_err();
        prop_assert!(matches!(err, QueryError::Coercion(_)));
        prop_assert_eq!(record.numbers, vec![42]);
    }

    #[test]
    fn omitempty_never_emits_zero_values(
        text in prop_oneof![Just(String::new()), "[a-z]{1,5}"],
        number in prop_oneof![Just(0i32), any::<i32>()],
        flag in any::<bool>(),
        list in prop::collection::vec(any::<u8>(), 0..3),
    ) {
        let record = Sparse { text, number, flag, list };
        let output = marshal(&record).unwrap();
        prop_assert_eq!(output.contains_key("t"), !record.text.is_empty());
        prop_assert_eq!(output.contains_key("n"), record.number != 0);
        prop_assert_eq!(output.contains_key("b"), record.flag);
        prop_assert_eq!(output.contains_key("l"), !record.list.is_empty());
    }
}
