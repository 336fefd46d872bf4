//! Fixtures for the canteras benchmarks.

use canteras_lib::{Collection, Document, Fields, Record, Value};

/// Builds a roster of `n` members, each with a small nested history.
pub fn synthetic_roster(n: u32) -> Collection {
    let documents = (0..n)
        .map(|i| {
            let dni = format!("{:08}X", i);
            let history: Vec<Value> = (0..3)
                .map(|year| {
                    let entry: Fields = [
                        ("year".to_owned(), Value::from(2022 + year)),
                        ("paid".to_owned(), Value::from(i % 2 == 0)),
                    ]
                    .into();
                    Value::Map(entry)
                })
                .collect();
            let record = Record::new()
                .with("DNI", dni.as_str())
                .with("Nombre", format!("Socio número {i}"))
                .with("NumeroSocio", i)
                .with("password", "U2FsdGVkX1+abcdefghijklmnop")
                .with("cuotas", history);
            Document::new(dni, record).expect("generated identifiers are valid")
        })
        .collect();
    Collection::with_documents("socios", documents)
}
