use std::fs;

use rax_user_storage::{
    CoreError, ErrorKind, SecretProvider, Secret, Session, StorageConfig, StorageService,
};
use tempfile::TempDir;

// Hands out a fixed list of passwords, one per attempt
struct Passwords {
    secrets: Vec<&'static str>,
    register: bool,
}

impl Passwords {
    fn login(secrets: &[&'static str]) -> Self {
        Self {
            secrets: secrets.to_vec(),
            register: false,
        }
    }

    fn register(secret: &'static str) -> Self {
        Self {
            secrets: vec![secret],
            register: true,
        }
    }
}

impl SecretProvider for Passwords {
    fn next_secret(&mut self, _name: &str, attempt: u32) -> Option<Secret> {
        self.secrets
            .get(attempt as usize - 1)
            .map(|secret| Secret::from(*secret))
    }

    fn confirm_registration(&mut self, _name: &str) -> bool {
        self.register
    }
}

// Opens a service whose storage root and store files live in `dir`
fn open(dir: &TempDir) -> StorageService {
    StorageService::open(StorageConfig::under(dir.path())).unwrap()
}

fn register(service: &mut StorageService, name: &str, secret: &'static str) -> Session {
    service.login(name, &mut Passwords::register(secret)).unwrap()
}

#[test]
fn test_first_login_copy_scenario() {
    let dir = TempDir::new().unwrap();
    let mut service = open(&dir);

    let mut session = register(&mut service, "alice", "pw");
    assert_eq!(session.cursor(), session.root());

    session.create("docs").unwrap();
    assert_eq!(session.cursor_virtual_path(), "/docs");
    session.create("/docs/note.txt").unwrap();
    session.append("/docs/note.txt", b"hello").unwrap();
    session.copy_to("/docs", "/backup").unwrap();
    assert_eq!(session.cursor_virtual_path(), "/backup");

    assert_eq!(session.read("/backup/note.txt").unwrap(), b"hello");
    assert_eq!(session.read("/docs/note.txt").unwrap(), b"hello");
}

#[test]
fn test_wrong_passwords_then_success() {
    let dir = TempDir::new().unwrap();
    let mut service = open(&dir);
    let session = register(&mut service, "bob", "right");
    service.logout(session).unwrap();

    let err = service
        .login("bob", &mut Passwords::login(&["x", "y", "z"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthFailure);

    let session = service
        .login("bob", &mut Passwords::login(&["right"]))
        .unwrap();
    assert_eq!(session.name(), "bob");
}

#[test]
fn test_registry_survives_restart() {
    let dir = TempDir::new().unwrap();

    let (alice_id, bob_id) = {
        let mut service = open(&dir);
        let alice = register(&mut service, "alice", "a-pass");
        let alice_id = alice.identity_id();
        service.logout(alice).unwrap();

        let bob = register(&mut service, "bob", "b-pass");
        let bob_id = bob.identity_id();
        service.logout(bob).unwrap();
        (alice_id, bob_id)
    };
    assert!(alice_id < bob_id);

    let mut service = open(&dir);
    assert_eq!(service.registry().find("alice").unwrap().id(), alice_id);
    assert_eq!(service.registry().find("bob").unwrap().id(), bob_id);

    let session = service
        .login("alice", &mut Passwords::login(&["a-pass"]))
        .unwrap();
    assert_eq!(session.identity_id(), alice_id);

    let carol = register(&mut service, "carol", "c-pass");
    assert!(carol.identity_id() > bob_id);
}

#[test]
fn test_rename_never_reuses_ids() {
    let dir = TempDir::new().unwrap();
    let mut service = open(&dir);

    let mut alice = register(&mut service, "alice", "pw");
    alice.create("keep.txt").unwrap();
    let old_root = alice.root().to_path_buf();

    service.rename(&mut alice, "alicia").unwrap();
    assert_eq!(alice.root(), old_root);
    assert!(alice.root().join("keep.txt").is_file());
    service.logout(alice).unwrap();

    let newcomer = register(&mut service, "alice", "other");
    let alicia = service.registry().find("alicia").unwrap();
    assert!(newcomer.identity_id() > alicia.id());
    assert_ne!(newcomer.root(), old_root);
}

#[test]
fn test_duplicate_registration_is_name_taken() {
    let dir = TempDir::new().unwrap();
    let mut service = open(&dir);
    let session = register(&mut service, "dave", "pw");
    service.logout(session).unwrap();

    let err = service.begin_registration("dave").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameTaken);
}

#[test]
fn test_sessions_cannot_reach_each_other() {
    let dir = TempDir::new().unwrap();
    let mut service = open(&dir);

    let mut alice = register(&mut service, "alice", "pw");
    alice.create("secret.txt").unwrap();
    let mut bob = register(&mut service, "bob", "pw");

    let err = bob.read("../0/secret.txt").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    let err = bob.copy_to("../0", "/stolen").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    assert!(!bob.root().join("stolen").exists());
    assert!(alice.root().join("secret.txt").is_file());
}

#[test]
fn test_corrupt_store_refuses_to_open() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig::under(dir.path());
    fs::write(config.counter_path(), "not a number").unwrap();
    fs::write(
        config.registry_path(),
        r#"{"version":1,"identities":[]}"#,
    )
    .unwrap();

    let err = StorageService::open(config).err().unwrap();
    assert_eq!(CoreError::from(err).kind(), ErrorKind::StoreCorrupt);
}
