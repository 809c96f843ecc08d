//! Curated multilingual column-name synonyms.
//!
//! Two tables: the extended lists feed the fuzzy header scorer, the compact
//! lists are the literal fallbacks the extractor probes when a field ended
//! up unmapped.

use crate::domain::CanonicalField;

/// Column names that force a mapping regardless of fuzzy scores.
pub const LITERAL_OVERRIDES: &[(&str, CanonicalField)] = &[
    ("cantina", CanonicalField::Winery),
    ("annata", CanonicalField::Vintage),
    ("etichetta", CanonicalField::Name),
    ("fornitore", CanonicalField::Supplier),
];

/// Bare quantity tokens; a column starting with one of these is almost
/// certainly a quantity column, so its score toward other fields is halved.
pub const QTY_QUALIFIER_TOKENS: &[&str] = &["q", "qta", "qtà", "qty"];

/// Extended synonym lists used by the fuzzy header scorer.
pub fn synonyms(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Name => &[
            "nome",
            "vino",
            "wine",
            "wine name",
            "nome vino",
            "denominazione",
            "etichetta",
            "label",
            "prodotto",
            "articolo",
            "descrizione",
            "titolo",
            "nome prodotto",
            "denominazione vino",
            "nome articolo",
        ],
        CanonicalField::Winery => &[
            "produttore",
            "producer",
            "winery",
            "azienda",
            "casa vinicola",
            "marca",
            "brand",
            "cantina",
            "fattoria",
            "azienda vinicola",
            "casa produttrice",
            "domaine",
            "chateau",
        ],
        CanonicalField::Supplier => &[
            "fornitore",
            "supplier",
            "importatore",
            "distributore",
            "fornitura",
            "rappresentante",
            "rappresentato da",
        ],
        CanonicalField::Vintage => &[
            "annata",
            "year",
            "vintage",
            "anno",
            "yr",
            "vendemmia",
            "anno produzione",
            "anno vendemmia",
        ],
        CanonicalField::Qty => &[
            "quantità",
            "quantity",
            "qty",
            "q.tà",
            "q.ty",
            "qta",
            "pezzi",
            "bottiglie",
            "pz",
            "scorta",
            "stock",
            "disponibilità",
            "giacenza",
            "quantità in magazzino",
            "qta magazzino",
        ],
        CanonicalField::Price => &[
            "prezzo",
            "price",
            "p.u.",
            "prezzo vendita",
            "prezzo di vendita",
            "prezzo al pubblico",
            "listino",
            "prezzo unitario",
            "eur",
            "euro",
            "valore",
            "€/pz",
            "prezzo pz",
            "prezzo bottiglia",
            "selling price",
        ],
        CanonicalField::WineType => &[
            "tipo",
            "type",
            "tipologia",
            "categoria",
            "colore",
            "tipo vino",
            "categoria vino",
            "colore vino",
            "tipologia vino",
        ],
        CanonicalField::GrapeVariety => &[
            "uvaggio",
            "grape variety",
            "grape",
            "varietà",
            "uve",
            "vitigno",
            "vitigni",
            "varietà uve",
        ],
        CanonicalField::Region => &[
            "regione",
            "region",
            "area",
            "zona",
            "territorio",
            "terroir",
            "zona produzione",
        ],
        CanonicalField::Country => &[
            "nazione",
            "country",
            "paese",
            "origine",
            "provenienza",
            "paese origine",
        ],
        CanonicalField::Classification => &[
            "denominazione",
            "classification",
            "classificazione",
            "docg",
            "doc",
            "igt",
            "igp",
            "aoc",
            "dop",
            "vino da tavola",
        ],
        CanonicalField::CostPrice => &[
            "costo",
            "cost",
            "costo unitario",
            "costo fornitore",
            "prezzo acquisto",
            "costo acquisto",
            "cost price",
            "costo bottiglia",
        ],
        CanonicalField::AlcoholContent => &[
            "alcol",
            "alcool",
            "alcohol",
            "gradazione",
            "gradazione alcolica",
            "abv",
            "vol",
            "vol%",
            "alcol %",
        ],
        CanonicalField::Description => &[
            "descrizione",
            "description",
            "descrizione prodotto",
            "descrizione vino",
            "dettagli",
            "caratteristiche",
        ],
        CanonicalField::Notes => &[
            "note",
            "notes",
            "osservazioni",
            "annotazioni",
            "commenti",
            "note aggiuntive",
        ],
    }
}

/// Compact high-precision fallbacks probed literally by the extractor when a
/// field has no mapped column.
pub fn fallback_synonyms(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Name => &["vino", "etichetta", "nome", "descrizione"],
        CanonicalField::Winery => &["cantina", "produttore", "azienda"],
        CanonicalField::Supplier => &["fornitore", "importatore", "distributore"],
        CanonicalField::Vintage => &["annata", "year", "yr", "anno"],
        CanonicalField::Qty => &["quantità", "qta", "pezzi", "bottiglie", "pz", "q.ty"],
        CanonicalField::Price => &["prezzo", "€/pz", "costo", "valore", "price"],
        CanonicalField::WineType => &["tipologia", "colore", "categoria"],
        CanonicalField::GrapeVariety => &["uvaggio", "vitigno"],
        CanonicalField::Region => &["regione", "zona"],
        CanonicalField::Country => &["nazione", "paese"],
        CanonicalField::Classification => &["denominazione", "classificazione"],
        CanonicalField::CostPrice => &["costo", "cost"],
        CanonicalField::AlcoholContent => &["alcol", "gradazione"],
        CanonicalField::Description => &["descrizione"],
        CanonicalField::Notes => &["note"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_synonyms() {
        for field in CanonicalField::ALL {
            assert!(!synonyms(field).is_empty(), "no synonyms for {field}");
            assert!(
                !fallback_synonyms(field).is_empty(),
                "no fallbacks for {field}"
            );
        }
    }

    #[test]
    fn test_literal_overrides_point_at_distinct_fields() {
        let mut fields: Vec<_> = LITERAL_OVERRIDES.iter().map(|(_, f)| *f).collect();
        fields.sort_by_key(|f| f.as_str());
        fields.dedup();
        assert_eq!(fields.len(), LITERAL_OVERRIDES.len());
    }
}
