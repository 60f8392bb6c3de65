// Esquema Diesel del almacén (SQLite). Debe mantenerse alineado con `migrations/`.
use diesel::{allow_tables_to_appear_in_same_query, joinable};

diesel::table! {
    archive_source (id) {
        id -> BigInt,
        name -> Text,
        version -> Text,
        file_name -> Text,
        created_at -> Timestamp,
        created_by -> Text,
    }
}

diesel::table! {
    archive_compound (id) {
        id -> BigInt,
        smiles -> Text,
        created_at -> Timestamp,
        created_by -> Text,
    }
}

diesel::table! {
    archive_compound_pattern (id) {
        id -> BigInt,
        smarts -> Text,
        created_at -> Timestamp,
        created_by -> Text,
    }
}

diesel::table! {
    archive_reaction (id) {
        id -> BigInt,
        smiles -> Text,
        created_at -> Timestamp,
        created_by -> Text,
    }
}

diesel::table! {
    archive_reaction_pattern (id) {
        id -> BigInt,
        smarts -> Text,
        created_at -> Timestamp,
        created_by -> Text,
    }
}

diesel::table! {
    archive_compound_source (archive_compound_id, archive_source_id) {
        archive_compound_id -> BigInt,
        archive_source_id -> BigInt,
    }
}

diesel::table! {
    archive_compound_pattern_source (archive_compound_pattern_id, archive_source_id) {
        archive_compound_pattern_id -> BigInt,
        archive_source_id -> BigInt,
    }
}

diesel::table! {
    archive_reaction_source (archive_reaction_id, archive_source_id) {
        archive_reaction_id -> BigInt,
        archive_source_id -> BigInt,
    }
}

diesel::table! {
    archive_reaction_pattern_source (archive_reaction_pattern_id, archive_source_id) {
        archive_reaction_pattern_id -> BigInt,
        archive_source_id -> BigInt,
    }
}

diesel::table! {
    workbench_compound (id) {
        id -> BigInt,
        smiles -> Text,
        is_building_block -> Bool,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Nullable<Timestamp>,
        updated_by -> Nullable<Text>,
    }
}

diesel::table! {
    workbench_compound_pattern (id) {
        id -> BigInt,
        smarts -> Text,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Nullable<Timestamp>,
        updated_by -> Nullable<Text>,
    }
}

diesel::table! {
    workbench_reaction (id) {
        id -> BigInt,
        smiles -> Text,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Nullable<Timestamp>,
        updated_by -> Nullable<Text>,
    }
}

diesel::table! {
    workbench_reaction_pattern (id) {
        id -> BigInt,
        smarts -> Text,
        created_at -> Timestamp,
        created_by -> Text,
        updated_at -> Nullable<Timestamp>,
        updated_by -> Nullable<Text>,
    }
}

diesel::table! {
    workbench_compound_archive (workbench_compound_id, archive_compound_id) {
        workbench_compound_id -> BigInt,
        archive_compound_id -> BigInt,
    }
}

diesel::table! {
    workbench_compound_pattern_archive (workbench_compound_pattern_id, archive_compound_pattern_id) {
        workbench_compound_pattern_id -> BigInt,
        archive_compound_pattern_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_archive (workbench_reaction_id, archive_reaction_id) {
        workbench_reaction_id -> BigInt,
        archive_reaction_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_pattern_archive (workbench_reaction_pattern_id, archive_reaction_pattern_id) {
        workbench_reaction_pattern_id -> BigInt,
        archive_reaction_pattern_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_reactant_compound (workbench_reaction_id, workbench_compound_id) {
        workbench_reaction_id -> BigInt,
        workbench_compound_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_spectator_compound (workbench_reaction_id, workbench_compound_id) {
        workbench_reaction_id -> BigInt,
        workbench_compound_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_product_compound (workbench_reaction_id, workbench_compound_id) {
        workbench_reaction_id -> BigInt,
        workbench_compound_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_pattern_reactant_compound_pattern (workbench_reaction_pattern_id, workbench_compound_pattern_id) {
        workbench_reaction_pattern_id -> BigInt,
        workbench_compound_pattern_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_pattern_spectator_compound_pattern (workbench_reaction_pattern_id, workbench_compound_pattern_id) {
        workbench_reaction_pattern_id -> BigInt,
        workbench_compound_pattern_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_pattern_product_compound_pattern (workbench_reaction_pattern_id, workbench_compound_pattern_id) {
        workbench_reaction_pattern_id -> BigInt,
        workbench_compound_pattern_id -> BigInt,
    }
}

diesel::table! {
    workbench_compound_structure_pattern (workbench_compound_id, workbench_compound_pattern_id) {
        workbench_compound_id -> BigInt,
        workbench_compound_pattern_id -> BigInt,
    }
}

diesel::table! {
    workbench_reaction_transformation_pattern (workbench_reaction_id, workbench_reaction_pattern_id) {
        workbench_reaction_id -> BigInt,
        workbench_reaction_pattern_id -> BigInt,
    }
}

joinable!(archive_compound_source -> archive_compound (archive_compound_id));
joinable!(archive_compound_source -> archive_source (archive_source_id));
joinable!(archive_compound_pattern_source -> archive_compound_pattern (archive_compound_pattern_id));
joinable!(archive_compound_pattern_source -> archive_source (archive_source_id));
joinable!(archive_reaction_source -> archive_reaction (archive_reaction_id));
joinable!(archive_reaction_source -> archive_source (archive_source_id));
joinable!(archive_reaction_pattern_source -> archive_reaction_pattern (archive_reaction_pattern_id));
joinable!(archive_reaction_pattern_source -> archive_source (archive_source_id));
joinable!(workbench_compound_archive -> workbench_compound (workbench_compound_id));
joinable!(workbench_compound_archive -> archive_compound (archive_compound_id));
joinable!(workbench_compound_pattern_archive -> workbench_compound_pattern (workbench_compound_pattern_id));
joinable!(workbench_compound_pattern_archive -> archive_compound_pattern (archive_compound_pattern_id));
joinable!(workbench_reaction_archive -> workbench_reaction (workbench_reaction_id));
joinable!(workbench_reaction_archive -> archive_reaction (archive_reaction_id));
joinable!(workbench_reaction_pattern_archive -> workbench_reaction_pattern (workbench_reaction_pattern_id));
joinable!(workbench_reaction_pattern_archive -> archive_reaction_pattern (archive_reaction_pattern_id));
joinable!(workbench_reaction_reactant_compound -> workbench_reaction (workbench_reaction_id));
joinable!(workbench_reaction_reactant_compound -> workbench_compound (workbench_compound_id));
joinable!(workbench_reaction_spectator_compound -> workbench_reaction (workbench_reaction_id));
joinable!(workbench_reaction_spectator_compound -> workbench_compound (workbench_compound_id));
joinable!(workbench_reaction_product_compound -> workbench_reaction (workbench_reaction_id));
joinable!(workbench_reaction_product_compound -> workbench_compound (workbench_compound_id));
joinable!(workbench_reaction_pattern_reactant_compound_pattern -> workbench_reaction_pattern (workbench_reaction_pattern_id));
joinable!(workbench_reaction_pattern_reactant_compound_pattern -> workbench_compound_pattern (workbench_compound_pattern_id));
joinable!(workbench_reaction_pattern_spectator_compound_pattern -> workbench_reaction_pattern (workbench_reaction_pattern_id));
joinable!(workbench_reaction_pattern_spectator_compound_pattern -> workbench_compound_pattern (workbench_compound_pattern_id));
joinable!(workbench_reaction_pattern_product_compound_pattern -> workbench_reaction_pattern (workbench_reaction_pattern_id));
joinable!(workbench_reaction_pattern_product_compound_pattern -> workbench_compound_pattern (workbench_compound_pattern_id));
joinable!(workbench_compound_structure_pattern -> workbench_compound (workbench_compound_id));
joinable!(workbench_compound_structure_pattern -> workbench_compound_pattern (workbench_compound_pattern_id));
joinable!(workbench_reaction_transformation_pattern -> workbench_reaction (workbench_reaction_id));
joinable!(workbench_reaction_transformation_pattern -> workbench_reaction_pattern (workbench_reaction_pattern_id));

allow_tables_to_appear_in_same_query!(
  archive_source,
  archive_compound,
  archive_compound_pattern,
  archive_reaction,
  archive_reaction_pattern,
  archive_compound_source,
  archive_compound_pattern_source,
  archive_reaction_source,
  archive_reaction_pattern_source,
  workbench_compound,
  workbench_compound_pattern,
  workbench_reaction,
  workbench_reaction_pattern,
  workbench_compound_archive,
  workbench_compound_pattern_archive,
  workbench_reaction_archive,
  workbench_reaction_pattern_archive,
  workbench_reaction_reactant_compound,
  workbench_reaction_spectator_compound,
  workbench_reaction_product_compound,
  workbench_reaction_pattern_reactant_compound_pattern,
  workbench_reaction_pattern_spectator_compound_pattern,
  workbench_reaction_pattern_product_compound_pattern,
  workbench_compound_structure_pattern,
  workbench_reaction_transformation_pattern
);
