use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::json;
use tempfile::tempdir;

const LAUNCHER_ID: &str = "1111111111111111111111111111111111111111111111111111111111111111";

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> String {
    let path = dir.join(name);
    fs::write(&path, value.to_string()).expect("write fixture");
    path.to_string_lossy().to_string()
}

fn snapshot() -> serde_json::Value {
    json!({
        "wallets": [
            { "id": 1, "name": "HDDcoin Wallet", "type": 0 },
            { "id": 2, "name": "Dbx", "type": 6, "meta": { "assetId": "aa", "name": "DBX" } }
        ],
        "balances": [
            { "walletId": 1, "spendableBalance": 2_000_000_000_000_u64, "confirmedWalletBalance": 2_000_000_000_000_u64 },
            { "walletId": 2, "spendableBalance": 5000, "confirmedWalletBalance": 5000 }
        ],
        "offers": [{
            "tradeId": "0xfeed",
            "isMyOffer": true,
            "status": "PENDING_ACCEPT",
            "pending": { "hdd": 500_000_000_000_u64, "unknown": 10 },
            "summary": { "infos": {} }
        }]
    })
}

fn hdd_offer() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hdd-offer"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn reconcile_prints_offer_plan() {
    let tmp = tempdir().expect("tempdir");
    let snapshot_path = write_json(tmp.path(), "snapshot.json", &snapshot());
    let offer_path = write_json(
        tmp.path(),
        "offer.json",
        &json!({
            "offered": { "hdd": [{ "amount": "1.9" }] },
            "requested": { "tokens": [{ "assetId": "aa", "amount": "2" }] }
        }),
    );

    let output = hdd_offer()
        .args(["reconcile", "--snapshot", &snapshot_path, "--offer", &offer_path])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let plan: serde_json::Value = serde_json::from_slice(&output).expect("plan json");
    assert_eq!(plan["walletIdsAndAmounts"]["1"], "-1900000000000");
    assert_eq!(plan["walletIdsAndAmounts"]["2"], "2000");
    assert_eq!(plan["assetsToUnlock"][0]["assetId"], "HDD+FEE");
    assert_eq!(plan["assetsToUnlock"][0]["status"], "alsoUsedInNewOfferWithoutConflict");
}

#[test]
fn reconcile_failure_reports_error_code() {
    let tmp = tempdir().expect("tempdir");
    let snapshot_path = write_json(tmp.path(), "snapshot.json", &snapshot());
    let offer_path = write_json(
        tmp.path(),
        "offer.json",
        &json!({ "offered": { "hdd": [{ "amount": "3" }] } }),
    );

    hdd_offer()
        .args(["reconcile", "--snapshot", &snapshot_path, "--offer", &offer_path])
        .assert()
        .failure()
        .stderr(contains("error[insufficient_balance]: Amount exceeds HDD total balance"));
}

#[test]
fn empty_offer_column_flag_is_honoured() {
    let tmp = tempdir().expect("tempdir");
    let snapshot_path = write_json(tmp.path(), "snapshot.json", &snapshot());
    let offer_path = write_json(
        tmp.path(),
        "offer.json",
        &json!({ "requested": { "hdd": [{ "amount": "1" }] } }),
    );

    hdd_offer()
        .args(["reconcile", "--snapshot", &snapshot_path, "--offer", &offer_path])
        .assert()
        .failure()
        .stderr(contains("error[no_offered_asset]"));

    hdd_offer()
        .args([
            "reconcile",
            "--snapshot",
            &snapshot_path,
            "--offer",
            &offer_path,
            "--allow-empty-offer-column",
            "--validate-only",
        ])
        .assert()
        .success()
        .stdout(contains("\"validateOnly\": true"));
}

#[test]
fn from_summary_swaps_sides() {
    let tmp = tempdir().expect("tempdir");
    let summary_path = write_json(
        tmp.path(),
        "summary.json",
        &json!({
            "offered": { "hdd": 1_000_000_000_000_u64 },
            "requested": { "aa": 1500 },
            "fees": 0,
            "infos": { "aa": { "type": "CAT", "tail": "0xaa" } }
        }),
    );

    let output = hdd_offer()
        .args([
            "from-summary",
            "--summary",
            &summary_path,
            "--set-default-offered-fee",
            "--default-fee-bytes",
            "5000000",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let data: serde_json::Value = serde_json::from_slice(&output).expect("builder json");
    assert_eq!(data["offered"]["tokens"][0]["amount"], "1.5");
    assert_eq!(data["offered"]["fee"][0]["amount"], "0.000005");
    assert_eq!(data["requested"]["hdd"][0]["amount"], "1");
}

#[test]
fn pending_lists_aggregated_locks() {
    let tmp = tempdir().expect("tempdir");
    let snapshot_path = write_json(tmp.path(), "snapshot.json", &snapshot());

    hdd_offer()
        .args(["pending", "--snapshot", &snapshot_path])
        .assert()
        .success()
        .stdout(contains("\"lockedAmount\": \"500000000010\""))
        .stdout(contains("0xfeed"));
}

#[test]
fn nft_ids_convert_both_ways() {
    let nft_id = hdd_offer()
        .args(["nft-id", &format!("0x{LAUNCHER_ID}")])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let nft_id = String::from_utf8(nft_id).expect("utf8");
    assert!(nft_id.trim().starts_with("nft1"));

    hdd_offer()
        .args(["launcher-id", nft_id.trim()])
        .assert()
        .success()
        .stdout(contains(LAUNCHER_ID));

    hdd_offer()
        .args(["launcher-id", "nft1notvalid"])
        .assert()
        .failure()
        .stderr(contains("error[invalid_nft_id]"));
}
