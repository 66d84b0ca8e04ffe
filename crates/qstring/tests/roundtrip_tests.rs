use qstring::{marshal, marshal_string, unmarshal, Query, QueryValues};

#[derive(Query, Default, Debug, PartialEq)]
pub struct Search {
    #[qstring("q")]
    pub query: String,
    pub page: u32,
    pub limit: i64,
    pub exact: bool,
    pub boost: f64,
    pub fields: Vec<String>,
    pub ids: Vec<i32>,
}

#[derive(Query, Default, Debug, PartialEq)]
pub struct Paging {
    pub page: i32,
    pub limit: i32,
}

#[derive(Query, Default, Debug, PartialEq)]
pub struct Params {
    pub paging: Paging,
    pub name: String,
}

/// Assert that decoding `query` and re-encoding yields the same values.
fn assert_roundtrip<T>(query: &str)
where
    T: Record + Default,
{
    let input = QueryValues::parse(query);
    let mut record = T::default();
    unmarshal(&input, &mut record).expect("decode failed");
    let output = marshal(&record).expect("encode failed");
    assert_eq!(
        input, output,
        "Roundtrip failed:\n  input:  {query}\n  output: {}",
        output.encode()
    );
}

/// Everything `#[derive(Query)]` implements.
trait Record: qstring::Unmarshal + qstring::Marshal {}
impl<T: qstring::Unmarshal + qstring::Marshal> Record for T {}

#[test]
fn roundtrip_flat_record() {
    assert_roundtrip::<Search>(
        "boost=1.5&exact=true&fields=a&fields=b&ids=3&ids=1&limit=-20&page=2&q=rust+lang",
    );
}

#[test]
fn roundtrip_single_sequence() {
    #[derive(Query, Default)]
    pub struct Fields {
        #[qstring("fields")]
        pub fields: Vec<String>,
    }

    assert_roundtrip::<Fields>("fields=a&fields=b&fields=c");
}

#[test]
fn roundtrip_nested_record() {
    assert_roundtrip::<Params>("limit=50&name=x&page=1");
}

#[test]
fn roundtrip_through_query_string() {
    let original = Search {
        query: "a&b c".to_string(),
        page: 3,
        limit: 10,
        exact: false,
        boost: 0.3,
        fields: vec!["x".to_string(), "y z".to_string()],
        ids: vec![-1, 0, 1],
    };
    let rendered = marshal_string(&original).unwrap();

    let mut decoded = Search::default();
    unmarshal(&QueryValues::parse(&rendered), &mut decoded).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn roundtrip_ignores_unknown_keys() {
    let input = QueryValues::parse("page=1&limit=2&name=n&extra=1");
    let mut params = Params::default();
    unmarshal(&input, &mut params).unwrap();
    let output = marshal(&params).unwrap();
    assert!(!output.contains_key("extra"));
    assert_eq!(output.len(), 3);
}
