// tests/file_ops_tests.rs
mod common;
use common::{fast_config, sample, setup, IDENTITY};

use passfile_cipher::{
    decrypt_file, decrypt_file_default, encrypt_file, encrypt_file_default, CancelFlag,
    CipherError, Passphrase,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Anything the staging step might have left behind in `dir`
fn leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".partial"))
        .collect()
}

#[test]
fn test_empty_file_encrypts_to_iv_plus_one_block() {
    setup();
    let dir = tempdir().unwrap();
    let plain = dir.path().join("empty.txt");
    let enc = dir.path().join("empty.enc");
    let dec = dir.path().join("empty.out");
    fs::write(&plain, b"").unwrap();

    let report =
        encrypt_file_default(&plain, &enc, Some(IDENTITY), &mut Passphrase::from("pw")).unwrap();
    assert_eq!(fs::metadata(&enc).unwrap().len(), 32);
    assert_eq!(report.plaintext_bytes, 0);
    assert_eq!(report.container_bytes, 32);

    decrypt_file_default(&enc, &dec, Some(IDENTITY), &mut Passphrase::from("pw")).unwrap();
    assert!(fs::read(&dec).unwrap().is_empty());
}

#[test]
fn test_hello_encrypts_to_32_bytes_and_back() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("hello.txt");
    let enc = dir.path().join("hello.enc");
    let dec = dir.path().join("hello.out");
    fs::write(&plain, b"hello").unwrap();

    encrypt_file_default(&plain, &enc, Some(IDENTITY), &mut Passphrase::from("pw")).unwrap();
    assert_eq!(fs::read(&enc).unwrap().len(), 32);

    let report =
        decrypt_file_default(&enc, &dec, Some(IDENTITY), &mut Passphrase::from("pw")).unwrap();
    assert_eq!(fs::read(&dec).unwrap(), b"hello");
    assert_eq!(report.plaintext_bytes, 5);
    assert_eq!(report.container_bytes, 32);
}

#[test]
fn test_encrypt_file_and_decrypt_file_roundtrip() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.bin");
    let enc = dir.path().join("secret.enc");
    let dec = dir.path().join("out.bin");
    let data = sample(50_000);
    fs::write(&plain, &data).unwrap();

    let config = fast_config();
    let cancel = CancelFlag::new();

    let mut pw = Passphrase::from("The quick brown fox");
    let enc_report = encrypt_file(&plain, &enc, Some(IDENTITY), &mut pw, &config, &cancel).unwrap();
    assert!(pw.is_wiped());

    let mut pw = Passphrase::from("The quick brown fox");
    let dec_report = decrypt_file(&enc, &dec, Some(IDENTITY), &mut pw, &config, &cancel).unwrap();
    assert!(pw.is_wiped());

    assert_eq!(fs::read(&dec).unwrap(), data);
    assert_eq!(enc_report.plaintext_bytes, dec_report.plaintext_bytes);
    assert_eq!(enc_report.container_bytes, dec_report.container_bytes);
    assert_eq!(enc_report.container_bytes, fs::metadata(&enc).unwrap().len());
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_wrong_passphrase_leaves_no_output() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let enc = dir.path().join("secret.enc");
    let dec = dir.path().join("out.txt");
    fs::write(&plain, sample(300)).unwrap();

    let config = fast_config();
    let cancel = CancelFlag::new();
    encrypt_file(
        &plain,
        &enc,
        Some(IDENTITY),
        &mut Passphrase::from("right"),
        &config,
        &cancel,
    )
    .unwrap();

    let mut pw = Passphrase::from("wrong");
    let result = decrypt_file(&enc, &dec, Some(IDENTITY), &mut pw, &config, &cancel);
    assert!(pw.is_wiped());

    match result {
        Err(e) => {
            assert!(matches!(e, CipherError::Padding), "{e:?}");
            assert!(!dec.exists());
        }
        // A wrong key passes the padding check now and then; the output is garbage
        Ok(_) => assert_ne!(fs::read(&dec).unwrap(), sample(300)),
    }
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_truncated_container_leaves_no_output() {
    let dir = tempdir().unwrap();
    let enc = dir.path().join("short.enc");
    let dec = dir.path().join("short.out");
    fs::write(&enc, [0u8; 20]).unwrap();

    let err = decrypt_file(
        &enc,
        &dec,
        Some(IDENTITY),
        &mut Passphrase::from("pw"),
        &fast_config(),
        &CancelFlag::new(),
    )
    .unwrap_err();

    assert!(matches!(err, CipherError::Format(_)), "{err:?}");
    assert!(!dec.exists());
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_cancelled_operation_leaves_no_output() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let enc = dir.path().join("secret.enc");
    fs::write(&plain, sample(10_000)).unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();

    let mut pw = Passphrase::from("pw");
    let err = encrypt_file(&plain, &enc, Some(IDENTITY), &mut pw, &fast_config(), &cancel)
        .unwrap_err();

    assert!(matches!(err, CipherError::Cancelled));
    assert!(pw.is_wiped());
    assert!(!enc.exists());
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_missing_input_is_io_error_and_wipes_passphrase() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.txt");
    let enc = dir.path().join("secret.enc");

    let mut pw = Passphrase::from("pw");
    let err = encrypt_file(
        &missing,
        &enc,
        Some(IDENTITY),
        &mut pw,
        &fast_config(),
        &CancelFlag::new(),
    )
    .unwrap_err();

    assert!(matches!(err, CipherError::Io(_)), "{err:?}");
    assert!(pw.is_wiped());
    assert!(!enc.exists());
}

#[test]
fn test_existing_output_is_replaced() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let enc = dir.path().join("secret.enc");
    let dec = dir.path().join("out.txt");
    fs::write(&plain, b"fresh contents").unwrap();
    fs::write(&enc, b"stale").unwrap();
    fs::write(&dec, vec![b'x'; 1_000]).unwrap();

    let config = fast_config();
    let cancel = CancelFlag::new();
    encrypt_file(&plain, &enc, None, &mut Passphrase::from("pw"), &config, &cancel).unwrap();
    decrypt_file(&enc, &dec, None, &mut Passphrase::from("pw"), &config, &cancel).unwrap();

    assert_eq!(fs::read(&dec).unwrap(), b"fresh contents");
}

#[test]
fn test_failed_decrypt_keeps_previous_output() {
    let dir = tempdir().unwrap();
    let enc = dir.path().join("broken.enc");
    let dec = dir.path().join("out.txt");
    // IV plus a ragged body
    fs::write(&enc, [7u8; 16 + 40]).unwrap();
    fs::write(&dec, b"previous result").unwrap();

    let err = decrypt_file(
        &enc,
        &dec,
        Some(IDENTITY),
        &mut Passphrase::from("pw"),
        &fast_config(),
        &CancelFlag::new(),
    )
    .unwrap_err();

    assert!(matches!(err, CipherError::Format(_)), "{err:?}");
    assert_eq!(fs::read(&dec).unwrap(), b"previous result");
    assert!(leftovers(dir.path()).is_empty());
}

#[test]
fn test_block_sized_chunks_stream_straight_to_disk() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.bin");
    let enc = dir.path().join("secret.enc");
    let dec = dir.path().join("out.bin");
    let data = sample(4_099);
    fs::write(&plain, &data).unwrap();

    // One AES block per read and write
    let config = fast_config().with_chunk_size(16);
    let cancel = CancelFlag::new();
    let enc_report =
        encrypt_file(&plain, &enc, Some(IDENTITY), &mut Passphrase::from("pw"), &config, &cancel)
            .unwrap();
    let dec_report =
        decrypt_file(&enc, &dec, Some(IDENTITY), &mut Passphrase::from("pw"), &config, &cancel)
            .unwrap();

    assert_eq!(fs::metadata(&enc).unwrap().len(), 16 + 4_112);
    assert_eq!(enc_report.container_bytes, 16 + 4_112);
    assert_eq!(dec_report.plaintext_bytes, 4_099);
    assert_eq!(fs::read(&dec).unwrap(), data);

    // Different chunking on the way back in still reads the same container
    let again = dir.path().join("again.bin");
    decrypt_file(&enc, &again, Some(IDENTITY), &mut Passphrase::from("pw"), &fast_config(), &cancel)
        .unwrap();
    assert_eq!(fs::read(&again).unwrap(), data);
    assert!(leftovers(dir.path()).is_empty());
}
