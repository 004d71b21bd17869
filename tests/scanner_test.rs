//! Integration tests for the retrieve-then-classify pipeline
//!
//! Drives the retriever and classifier through their trait seams with
//! scripted fakes; no network access.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use holderscan::utils::units::to_base_units;
use holderscan::{
    AddressClassifier, AppError, AppResult, ChainReader, Classification, ErrorCode, HolderPage,
    HolderRetriever, PageFetcher, RawHolder,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

// ============================================
// Scripted page source
// ============================================

struct ScriptedPages {
    outcomes: Mutex<Vec<Result<HolderPage, ErrorCode>>>,
    calls: Mutex<u32>,
    /// Paused-clock timestamp of every fetch, for delay assertions
    fetch_times: Mutex<Vec<Instant>>,
}

impl ScriptedPages {
    fn new(outcomes: Vec<Result<HolderPage, ErrorCode>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            calls: Mutex::new(0),
            fetch_times: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    /// Durations between consecutive fetches
    fn gaps(&self) -> Vec<Duration> {
        let times = self.fetch_times.lock().unwrap();
        times.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }
}

#[async_trait]
impl<'a> PageFetcher for &'a ScriptedPages {
    async fn fetch_page(&self, _page_size: u64, _offset: Option<u64>) -> AppResult<HolderPage> {
        *self.calls.lock().unwrap() += 1;
        self.fetch_times.lock().unwrap().push(Instant::now());
        let mut outcomes = self.outcomes.lock().unwrap();
        match outcomes.remove(0) {
            Ok(page) => Ok(page),
            Err(code) => Err(AppError::new(code, "scripted failure")),
        }
    }
}

fn holder(addr_byte: u8, balance: &str) -> RawHolder {
    RawHolder {
        address: format!("0x{}", hex::encode([addr_byte; 20])),
        balance: balance.to_string(),
    }
}

fn addr(n: u8) -> Address {
    Address::repeat_byte(n)
}

// ============================================
// Retriever properties
// ============================================

/// Exact 18-decimal threshold boundary: a holder exactly at 25000 tokens is
/// included; one base unit below is excluded.
#[tokio::test(start_paused = true)]
async fn inclusive_threshold_boundary() {
    let threshold = to_base_units("25000", 18).unwrap();
    let exactly = "25000000000000000000000";
    let just_below = "24999999999999999999999";
    let above = "25000000000000000000001";

    let pages = ScriptedPages::new(vec![Ok(HolderPage {
        items: vec![
            holder(1, exactly),
            holder(2, just_below),
            holder(3, above),
        ],
        next_offset: None,
    })]);
    let retriever = HolderRetriever::new(&pages, 100, None);

    let holders = retriever.fetch_all(threshold).await.unwrap();
    assert_eq!(holders.len(), 2);
    assert_eq!(holders[0].address, addr(1));
    assert_eq!(holders[0].balance, threshold);
    assert_eq!(holders[1].address, addr(3));
}

/// Two-page retrieval issues exactly two requests: page 1 has 3 qualifying
/// + 2 non-qualifying holders and a cursor, page 2 has 1 qualifying holder
/// and no cursor, giving exactly 4 records in API order.
#[tokio::test(start_paused = true)]
async fn two_page_retrieval() {
    let pages = ScriptedPages::new(vec![
        Ok(HolderPage {
            items: vec![
                holder(1, "1000"),
                holder(2, "5"),
                holder(3, "2000"),
                holder(4, "999"),
                holder(5, "3000"),
            ],
            next_offset: Some(5),
        }),
        Ok(HolderPage {
            items: vec![holder(6, "1500")],
            next_offset: None,
        }),
    ]);
    let retriever = HolderRetriever::new(&pages, 5, None);

    let holders = retriever.fetch_all(U256::from(1000)).await.unwrap();
    assert_eq!(pages.call_count(), 2);
    assert_eq!(holders.len(), 4);
    let order: Vec<Address> = holders.iter().map(|h| h.address).collect();
    assert_eq!(order, vec![addr(1), addr(3), addr(5), addr(6)]);
}

/// A qualifying holder positioned as the very last item of the very last
/// page is not dropped.
#[tokio::test(start_paused = true)]
async fn qualifying_holder_last_item_of_last_page() {
    let pages = ScriptedPages::new(vec![
        Ok(HolderPage {
            items: vec![holder(1, "10")],
            next_offset: Some(1),
        }),
        Ok(HolderPage {
            items: vec![holder(2, "10"), holder(3, "100")],
            next_offset: None,
        }),
    ]);
    let retriever = HolderRetriever::new(&pages, 2, None);

    let holders = retriever.fetch_all(U256::from(100)).await.unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].address, addr(3));
}

/// A page that fails transiently below the attempt ceiling yields the same
/// result set as an immediate success.
#[tokio::test(start_paused = true)]
async fn transient_failures_are_transparent() {
    let page = HolderPage {
        items: vec![holder(1, "100")],
        next_offset: None,
    };

    let flaky = ScriptedPages::new(vec![
        Err(ErrorCode::HolderApiRateLimited),
        Err(ErrorCode::HolderApiHttp),
        Ok(page.clone()),
    ]);
    let clean = ScriptedPages::new(vec![Ok(page)]);

    let from_flaky = HolderRetriever::new(&flaky, 100, None)
        .fetch_all(U256::from(1))
        .await
        .unwrap();
    let from_clean = HolderRetriever::new(&clean, 100, None)
        .fetch_all(U256::from(1))
        .await
        .unwrap();

    assert_eq!(from_flaky, from_clean);
    assert_eq!(flaky.call_count(), 3);
}

/// Failing at the attempt ceiling fails the whole retrieval; the error
/// carries the last underlying cause.
#[tokio::test(start_paused = true)]
async fn retry_ceiling_fails_retrieval() {
    let pages = ScriptedPages::new(vec![
        Err(ErrorCode::HolderApiHttp),
        Err(ErrorCode::HolderApiHttp),
        Err(ErrorCode::HolderApiRateLimited),
    ]);
    let retriever = HolderRetriever::new(&pages, 100, None);

    let err = retriever.fetch_all(U256::from(1)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RetrievalFailed);
    assert!(err.to_string().contains("HOLDER_API_RATE_LIMITED"));
    assert_eq!(pages.call_count(), 3);
}

/// The backoff schedule is attempt-indexed: with a 1000ms base, the first
/// retry waits 2000ms (base * 2^1, not base * 2^0) and the second 4000ms.
/// The paused clock advances only through the retriever's sleeps, so the
/// gaps are exact.
#[tokio::test(start_paused = true)]
async fn backoff_starts_at_twice_base_and_doubles() {
    let pages = ScriptedPages::new(vec![
        Err(ErrorCode::HolderApiHttp),
        Err(ErrorCode::HolderApiRateLimited),
        Ok(HolderPage {
            items: vec![holder(1, "100")],
            next_offset: None,
        }),
    ]);
    let retriever = HolderRetriever::new(&pages, 100, None);

    retriever.fetch_all(U256::from(1)).await.unwrap();

    let gaps = pages.gaps();
    assert_eq!(gaps, vec![Duration::from_millis(2000), Duration::from_millis(4000)]);
}

/// Successful page fetches are spaced by the fixed 500ms provider pacing,
/// which is separate from the retry backoff.
#[tokio::test(start_paused = true)]
async fn successful_pages_are_paced_500ms_apart() {
    let pages = ScriptedPages::new(vec![
        Ok(HolderPage {
            items: vec![holder(1, "100")],
            next_offset: Some(1),
        }),
        Ok(HolderPage {
            items: vec![holder(2, "200")],
            next_offset: None,
        }),
    ]);
    let retriever = HolderRetriever::new(&pages, 1, None);

    retriever.fetch_all(U256::from(1)).await.unwrap();

    assert_eq!(pages.gaps(), vec![Duration::from_millis(500)]);
}

/// A retry mid-pagination does not disturb pages already collected.
#[tokio::test(start_paused = true)]
async fn retry_on_second_page_keeps_first_page() {
    let pages = ScriptedPages::new(vec![
        Ok(HolderPage {
            items: vec![holder(1, "100")],
            next_offset: Some(1),
        }),
        Err(ErrorCode::HolderApiRateLimited),
        Ok(HolderPage {
            items: vec![holder(2, "200")],
            next_offset: None,
        }),
    ]);
    let retriever = HolderRetriever::new(&pages, 1, None);

    let holders = retriever.fetch_all(U256::from(1)).await.unwrap();
    assert_eq!(holders.len(), 2);
    assert_eq!(pages.call_count(), 3);
}

// ============================================
// Classifier behavior
// ============================================

struct FakeChain {
    code: HashMap<Address, Vec<u8>>,
    probe: HashMap<Address, Result<Vec<u8>, ()>>,
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn get_code(&self, address: Address) -> AppResult<Vec<u8>> {
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }

    async fn call(&self, to: Address, _data: Vec<u8>) -> AppResult<Vec<u8>> {
        match self.probe.get(&to) {
            Some(Ok(ret)) => Ok(ret.clone()),
            _ => Err(AppError::new(ErrorCode::RpcError, "execution reverted")),
        }
    }
}

/// ABI-encode an address[] return value: offset word, length word, then
/// one left-padded word per address.
fn encode_owner_list(owners: &[Address]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut word = [0u8; 32];
    word[31] = 0x20;
    out.extend_from_slice(&word);
    let mut len = [0u8; 32];
    len[31] = owners.len() as u8;
    out.extend_from_slice(&len);
    for owner in owners {
        let mut padded = [0u8; 32];
        padded[12..].copy_from_slice(owner.as_slice());
        out.extend_from_slice(&padded);
    }
    out
}

/// No code -> EOA; code plus a 3-owner getOwners() -> multisig with count
/// 3; code plus a reverting probe -> contract. The third case never halts
/// the batch.
#[tokio::test]
async fn classification_three_way() {
    let eoa = addr(1);
    let safe = addr(2);
    let opaque = addr(3);

    let mut code = HashMap::new();
    code.insert(safe, vec![0x60, 0x80]);
    code.insert(opaque, vec![0x60, 0x80]);

    let mut probe: HashMap<Address, Result<Vec<u8>, ()>> = HashMap::new();
    probe.insert(
        safe,
        Ok(encode_owner_list(&[addr(10), addr(11), addr(12)])),
    );
    probe.insert(opaque, Err(()));

    let chain = FakeChain { code, probe };
    let classifier = AddressClassifier::new(&chain);

    assert_eq!(classifier.classify(eoa).await.unwrap(), Classification::Eoa);
    assert_eq!(
        classifier.classify(safe).await.unwrap(),
        Classification::MultisigWallet { owner_count: 3 }
    );
    assert_eq!(
        classifier.classify(opaque).await.unwrap(),
        Classification::Contract
    );
}

/// Classification is deterministic and stateless across repeated calls.
#[tokio::test]
async fn classification_is_deterministic() {
    let safe = addr(2);
    let mut code = HashMap::new();
    code.insert(safe, vec![0x60, 0x80]);
    let mut probe: HashMap<Address, Result<Vec<u8>, ()>> = HashMap::new();
    probe.insert(safe, Ok(encode_owner_list(&[addr(10), addr(11)])));

    let chain = FakeChain { code, probe };
    let classifier = AddressClassifier::new(&chain);

    for _ in 0..3 {
        assert_eq!(
            classifier.classify(safe).await.unwrap(),
            Classification::MultisigWallet { owner_count: 2 }
        );
    }
}
