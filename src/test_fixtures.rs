// src/test_fixtures.rs - Small reference hierarchies shared by unit tests
use std::sync::Arc;

use crate::hierarchy::store::InMemoryHierarchyStore;
use crate::models::hierarchy::District;

pub const ADILABAD_JSON: &str = r#"{
  "mandals": [
    {
      "mandalName": "Adilabad",
      "aliasName": "Edlabad",
      "villages": [
        { "villageName": "Adilabad" },
        { "villageName": "Batthisawargaon" },
        { "villageName": "Khanapur" }
      ]
    },
    {
      "mandalName": "Ichoda",
      "villages": [
        { "villageName": "Ichoda" },
        { "villageName": "Gundala" },
        { "villageName": "Narsapur" },
        { "villageName": "Sirichelma" }
      ]
    },
    {
      "mandalName": "Indervelly",
      "villages": [
        { "villageName": "Indervelly" },
        { "villageName": "Muthnur" },
        { "villageName": "Keslapur" }
      ]
    },
    {
      "mandalName": "Mavala (New)",
      "villages": [
        { "villageName": "Mavala", "isMandalHeadquarters": true },
        { "villageName": "Waghapur" }
      ]
    },
    {
      "mandalName": "Bela",
      "villages": [
        { "villageName": "Bela" },
        { "villageName": "Sangidi" },
        { "villageName": "Narsapur" },
        { "villageName": "Khanapur" },
        { "villageName": "Kottha Pally" }
      ]
    },
    {
      "mandalName": "Gudihathnoor",
      "aliasName": "Gudihatnur",
      "villages": [
        { "villageName": "Gudihathnoor" },
        { "villageName": "Mannur" },
        { "villageName": "Seethagondi" }
      ]
    }
  ]
}"#;

pub const NIRMAL_JSON: &str = r#"{
  "mandals": [
    {
      "mandalName": "Nirmal",
      "villages": [
        { "villageName": "Nirmal" },
        { "villageName": "Soan" }
      ]
    },
    {
      "mandalName": "Bela",
      "villages": [
        { "villageName": "Bela" },
        { "villageName": "Pochara" }
      ]
    },
    {
      "mandalName": "Kadem",
      "villages": [
        { "villageName": "Kadem" },
        { "villageName": "Peddur" }
      ]
    }
  ]
}"#;

pub fn adilabad() -> District {
    District::from_json("Adilabad", ADILABAD_JSON).unwrap()
}

pub fn adilabad_store() -> Arc<InMemoryHierarchyStore> {
    let mut store = InMemoryHierarchyStore::new();
    store.insert(adilabad());
    Arc::new(store)
}

pub fn two_district_store() -> Arc<InMemoryHierarchyStore> {
    let mut store = InMemoryHierarchyStore::new();
    store.insert(adilabad());
    store.insert(District::from_json("Nirmal", NIRMAL_JSON).unwrap());
    Arc::new(store)
}
