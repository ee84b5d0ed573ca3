//! Subject record and consent builders.

use disclosure_core::{
    ConsentRecord, ConsentStatus, JsonObject, PrivacyLevel, RecordId, RecordMeta, SubjectRecord,
    TenantId,
};
use rand::Rng;
use rand::rngs::StdRng;
use serde_json::{Value, json};

const TENANTS: &[&str] = &["tenant-north", "tenant-south", "tenant-east", "tenant-west"];

const FIRST_NAMES: &[&str] = &[
    "Maya", "Oliver", "Amara", "Leo", "Isla", "Noah", "Zara", "Finn", "Priya", "Kai",
];

const LAST_NAMES: &[&str] = &[
    "Okafor", "Smith", "Kowalski", "Nguyen", "Patel", "Jones", "Haddad", "Murphy",
];

const SCHOOLS: &[&str] = &[
    "Riverside Academy",
    "Hillside Primary",
    "St. Anne's",
    "Northgate High",
    "Meadow Lane School",
];

const CONDITIONS: &[&str] = &["asthma", "epilepsy", "dyslexia", "ADHD", "diabetes"];

const CARERS: &[&str] = &["Foster Team A", "Foster Team B", "Kinship carer", "Residential unit"];

const INCIDENTS: &[&str] = &[
    "Disrupted lesson",
    "Late to class",
    "Argument in corridor",
    "Left site without permission",
    "Damaged equipment",
];

const STAFF: &[&str] = &["Mr. Brown", "Ms. Green", "Dr. White", "Mrs. Black"];

const SOURCES: &[&str] = &["school", "la", "parent", "health"];

const INVOLVED_KEYS: &[&str] = &["involvedStudents", "involvedParties", "witnesses"];

const STAFF_KEYS: &[&str] = &["staffMember", "reportedBy", "recordedBy"];

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Wraps `value` in a provenance envelope with probability `envelope_fraction`.
fn leaf(rng: &mut StdRng, envelope_fraction: f64, value: Value) -> Value {
    if rng.gen_bool(envelope_fraction) {
        let source = pick(rng, SOURCES);
        let verified = rng.gen_bool(0.7);
        json!({ "value": value, "metadata": { "source": source, "verified": verified } })
    } else {
        value
    }
}

fn date(rng: &mut StdRng, base_year: u16) -> String {
    let year = base_year + rng.gen_range(0..4);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    format!("{year:04}-{month:02}-{day:02}")
}

/// Returns the record id for the `index`-th generated subject.
pub fn record_id(index: usize) -> RecordId {
    let s = format!("stu-{index:06}");
    RecordId::try_from(s.as_str()).unwrap_or_else(|_| unreachable!())
}

fn identity(rng: &mut StdRng, p: f64) -> Value {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let dob = date(rng, 2008);
    let national = format!("QQ{:06}C", rng.gen_range(0..1_000_000));
    json!({
        "firstName": leaf(rng, p, json!(first)),
        "lastName": leaf(rng, p, json!(last)),
        "dateOfBirth": leaf(rng, p, json!(dob)),
        "nationalId": leaf(rng, p, json!(national)),
        "preferredName": first,
    })
}

fn discipline_entry(rng: &mut StdRng, p: f64, num_records: usize) -> Value {
    let mut entry = serde_json::Map::new();
    entry.insert("date".to_owned(), json!(date(rng, 2022)));
    let summary = pick(rng, INCIDENTS);
    entry.insert("summary".to_owned(), leaf(rng, p, json!(summary)));

    let involved_key = pick(rng, INVOLVED_KEYS);
    let involved: Vec<String> = (0..rng.gen_range(0..4))
        .map(|_| format!("stu-{:06}", rng.gen_range(0..num_records.max(1))))
        .collect();
    entry.insert(involved_key.to_owned(), leaf(rng, p, json!(involved)));

    if rng.gen_bool(0.8) {
        let staff_key = pick(rng, STAFF_KEYS);
        let staff = pick(rng, STAFF);
        entry.insert(staff_key.to_owned(), leaf(rng, p, json!(staff)));
    }
    Value::Object(entry)
}

/// Generates the `index`-th subject record.
pub fn gen_record(rng: &mut StdRng, config: &super::GeneratorConfig, index: usize) -> SubjectRecord {
    let p = config.envelope_fraction;
    let mut sections = JsonObject::new();
    let mut insert = |name: &str, value: Value| {
        sections.insert(name.to_owned(), value);
    };

    let identity = identity(rng, p);
    insert("identity", identity);

    let school = pick(rng, SCHOOLS);
    let year_group = rng.gen_range(1..=13);
    let attendance = rng.gen_range(70..=100);
    let education = json!({
        "school": leaf(rng, p, json!(school)),
        "yearGroup": leaf(rng, p, json!(year_group)),
        "attendance": leaf(rng, p, json!(attendance)),
    });
    insert("education", education);

    let condition = pick(rng, CONDITIONS);
    let health = json!({ "conditions": leaf(rng, p, json!([condition])) });
    insert("health", health);

    let siblings = rng.gen_range(0..5);
    let family = json!({ "siblings": leaf(rng, p, json!(siblings)) });
    insert("family", family);

    let placements: Vec<Value> = (0..rng.gen_range(0..=config.max_placements))
        .map(|_| {
            let from = date(rng, 2015);
            let carer = pick(rng, CARERS);
            json!({ "from": from, "carer": leaf(rng, p, json!(carer)) })
        })
        .collect();
    insert("careHistory", json!({ "placements": placements }));

    let entries: Vec<Value> = (0..rng.gen_range(0..=config.max_discipline_entries))
        .map(|_| discipline_entry(rng, p, config.num_records))
        .collect();
    insert("discipline", Value::Array(entries));

    let street = rng.gen_range(1..200);
    let address = json!({ "line1": leaf(rng, p, json!(format!("{street} High Street"))) });
    insert("address", address);

    let privacy_level = if rng.gen_bool(config.restricted_fraction) {
        PrivacyLevel::Restricted
    } else {
        PrivacyLevel::Standard
    };
    let tenant = pick(rng, TENANTS);

    SubjectRecord {
        id: record_id(index),
        tenant_id: TenantId::try_from(tenant).unwrap_or_else(|_| unreachable!()),
        meta: RecordMeta {
            privacy_level,
            extra: JsonObject::new(),
        },
        sections,
    }
}

/// Generates the consent ledger entries for one subject.
pub fn gen_consents(
    rng: &mut StdRng,
    config: &super::GeneratorConfig,
    subject: &RecordId,
) -> Vec<ConsentRecord> {
    let mut consents = Vec::new();
    let consent = |category: &str, status: ConsentStatus| ConsentRecord {
        category: category.to_owned(),
        status,
        subject_id: Some(subject.clone()),
        extra: JsonObject::new(),
    };
    if rng.gen_bool(config.consent_fraction) {
        consents.push(consent("education_share", ConsentStatus::Granted));
    }
    if rng.gen_bool(0.2) {
        consents.push(consent("health_share", ConsentStatus::Revoked));
    }
    consents
}
