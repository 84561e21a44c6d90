//! SQL schema for the uadir SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    country     TEXT NOT NULL,
    description TEXT,
    UNIQUE (name, country)
);

CREATE TABLE IF NOT EXISTS experts (
    id            TEXT PRIMARY KEY,            -- hyphenated UUID
    name          TEXT NOT NULL CHECK (length(trim(name)) > 0),
    type          TEXT NOT NULL CHECK (type IN ('individual', 'organization')),
    title         TEXT,
    affiliation   TEXT,
    city_id       INTEGER NOT NULL REFERENCES cities(id),
    description   TEXT,
    founding_year INTEGER,
    is_diaspora   INTEGER NOT NULL DEFAULT 0,
    image         TEXT,                        -- URL or data: URL
    created_at    TEXT NOT NULL,               -- RFC 3339 UTC
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expert_focus_areas (
    expert_id  TEXT NOT NULL REFERENCES experts(id) ON DELETE CASCADE,
    focus_area TEXT NOT NULL CHECK (focus_area IN (
        'advocacy', 'humanitarian', 'cultural_diplomacy',
        'political_mobilization', 'research', 'policy_analysis',
        'community_support', 'integration', 'education', 'media'
    )),
    PRIMARY KEY (expert_id, focus_area)
);

CREATE TABLE IF NOT EXISTS contacts (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    expert_id     TEXT NOT NULL REFERENCES experts(id) ON DELETE CASCADE,
    contact_type  TEXT NOT NULL CHECK (contact_type IN (
        'email', 'phone', 'website', 'social_media', 'twitter',
        'facebook', 'linkedin', 'instagram', 'address'
    )),
    contact_value TEXT NOT NULL CHECK (length(contact_value) > 0),
    is_primary    INTEGER NOT NULL DEFAULT 0
);

-- At most one primary contact per type per expert.
CREATE UNIQUE INDEX IF NOT EXISTS contacts_primary_idx
    ON contacts(expert_id, contact_type) WHERE is_primary = 1;

CREATE TABLE IF NOT EXISTS tags (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS expert_tags (
    expert_id TEXT    NOT NULL REFERENCES experts(id) ON DELETE CASCADE,
    tag_id    INTEGER NOT NULL REFERENCES tags(id)    ON DELETE CASCADE,
    PRIMARY KEY (expert_id, tag_id)
);

-- Owned exclusively by organization-type experts.
CREATE TABLE IF NOT EXISTS key_figures (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    organization_id TEXT NOT NULL REFERENCES experts(id) ON DELETE CASCADE,
    name            TEXT NOT NULL CHECK (length(trim(name)) > 0),
    role            TEXT,
    description     TEXT
);

CREATE TABLE IF NOT EXISTS links (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    expert_id   TEXT NOT NULL REFERENCES experts(id) ON DELETE CASCADE,
    title       TEXT,
    url         TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS activities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    expert_id   TEXT NOT NULL REFERENCES experts(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    description TEXT,
    date_start  TEXT,                          -- YYYY-MM-DD
    date_end    TEXT
);

-- Owned exclusively by individual-type experts.
CREATE TABLE IF NOT EXISTS publications (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    expert_id        TEXT NOT NULL REFERENCES experts(id) ON DELETE CASCADE,
    title            TEXT NOT NULL,
    url              TEXT,
    publication_date TEXT,                     -- YYYY-MM-DD
    description      TEXT
);

CREATE INDEX IF NOT EXISTS experts_city_idx        ON experts(city_id);
CREATE INDEX IF NOT EXISTS experts_type_idx        ON experts(type);
CREATE INDEX IF NOT EXISTS focus_areas_area_idx    ON expert_focus_areas(focus_area);
CREATE INDEX IF NOT EXISTS contacts_expert_idx     ON contacts(expert_id);
CREATE INDEX IF NOT EXISTS expert_tags_tag_idx     ON expert_tags(tag_id);
CREATE INDEX IF NOT EXISTS key_figures_org_idx     ON key_figures(organization_id);
CREATE INDEX IF NOT EXISTS links_expert_idx        ON links(expert_id);
CREATE INDEX IF NOT EXISTS activities_expert_idx   ON activities(expert_id);
CREATE INDEX IF NOT EXISTS publications_expert_idx ON publications(expert_id);

PRAGMA user_version = 1;
";
