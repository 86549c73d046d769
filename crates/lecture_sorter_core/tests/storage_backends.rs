mod common;

use lecture_sorter_core::{
    ListingMode, ObjectKey, ObjectStore, UploadFile, Vault, VaultConfig,
};

fn exercise(vault: &Vault) {
    vault
        .ingest(
            "u1",
            "Math",
            "3",
            &[
                UploadFile::new("a.txt", "a"),
                UploadFile::new("b.pdf", common::sample_pdf(&["Matrices"])),
            ],
        )
        .unwrap();
    vault
        .register_assignment("u1", "Math", "HW1", "2026-10-20")
        .unwrap();
    vault.delete_file("u1", "Math", "3", "a.txt").unwrap();
}

#[test]
fn filesystem_and_sqlite_backends_behave_alike() {
    let fs_dir = tempfile::tempdir().unwrap();
    let sqlite_dir = tempfile::tempdir().unwrap();
    let fs_vault = Vault::open(
        &VaultConfig::filesystem(fs_dir.path().to_str().unwrap()).unwrap(),
    )
    .unwrap();
    let sqlite_config = VaultConfig::sqlite(sqlite_dir.path().to_str().unwrap()).unwrap();
    let sqlite_vault = Vault::open(&sqlite_config).unwrap();

    exercise(&fs_vault);
    exercise(&sqlite_vault);

    for mode in [ListingMode::Clean, ListingMode::Raw] {
        assert_eq!(
            fs_vault.get_namespace("u1", mode).unwrap(),
            sqlite_vault.get_namespace("u1", mode).unwrap()
        );
    }
    assert_eq!(
        fs_vault.export_archive("u1").unwrap().entry_names(),
        sqlite_vault.export_archive("u1").unwrap().entry_names()
    );
    assert!(sqlite_config.db_path().unwrap().is_file());
}

#[test]
fn sqlite_vault_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = VaultConfig::sqlite(dir.path().to_str().unwrap()).unwrap();

    {
        let vault = Vault::open(&config).unwrap();
        vault
            .ingest("u1", "Math", "1", &[UploadFile::new("a.txt", "a")])
            .unwrap();
    }

    let vault = Vault::open(&config).unwrap();
    let listing = vault.get_namespace("u1", ListingMode::Clean).unwrap();
    assert_eq!(listing.files("Math", "1").unwrap(), ["a.txt".to_string()]);

    let key = ObjectKey::parse("u1/Math/week_1/a.txt").unwrap();
    assert_eq!(vault.store().get(&key).unwrap(), Some(b"a".to_vec()));
    assert!(vault.store().location(&key).starts_with("sqlite:"));
}
