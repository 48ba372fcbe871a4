#![allow(dead_code)]

use http::Method;
use serde_json::{json, Map, Value};

use hydrant::store::{MemoryStore, Record};

/// Test record: one pet row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pet {
    pub id: Option<Value>,
    pub name: String,
    pub species: String,
    pub adopted: bool,
}

impl Record for Pet {
    const ENTITY: &'static str = "pet";

    fn primary_key(&self) -> Option<Value> {
        self.id.clone()
    }

    fn set_primary_key(&mut self, pk: Value) {
        self.id = Some(pk);
    }

    fn hydrate(&mut self, fields: &Map<String, Value>) {
        if let Some(name) = fields.get("name").and_then(Value::as_str) {
            self.name = name.to_string();
        }
        if let Some(species) = fields.get("species").and_then(Value::as_str) {
            self.species = species.to_string();
        }
        if let Some(adopted) = fields.get("adopted").and_then(Value::as_bool) {
            self.adopted = adopted;
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "species": self.species,
            "adopted": self.adopted,
        })
    }
}

/// A store seeded with pets 1 (Rex/dog), 2 (Whiskers/cat), 3 (Bubbles/fish).
pub fn seeded_store() -> MemoryStore<Pet> {
    let store = MemoryStore::new();
    for (name, species) in [("Rex", "dog"), ("Whiskers", "cat"), ("Bubbles", "fish")] {
        let mut pet = Pet {
            id: None,
            name: name.to_string(),
            species: species.to_string(),
            adopted: false,
        };
        store.save(&mut pet).expect("seed store");
    }
    store
}

/// Allow-list used by hydration tests: `name` and `species` only.
pub fn allow_name_species(params: &Map<String, Value>, _method: &Method) -> Map<String, Value> {
    let mut allowed = Map::new();
    for key in ["name", "species"] {
        if let Some(value) = params.get(key) {
            allowed.insert(key.to_string(), value.clone());
        }
    }
    allowed
}
