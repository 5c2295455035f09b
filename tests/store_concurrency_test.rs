// Concurrent access to the session and credential stores
use std::collections::HashSet;
use std::sync::Arc;

use sesame::testing::{fast_credential_store, registration};
use sesame::{CredentialError, SessionError, SessionStore, UserId};

const WORKERS: u64 = 16;
const SESSIONS_PER_WORKER: u64 = 250;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_extend_delete_loses_nothing() {
    let store = Arc::new(SessionStore::new(300));

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let store = store.clone();
            tokio::task::spawn_blocking(move || {
                let mut kept = Vec::new();
                for i in 0..SESSIONS_PER_WORKER {
                    let user_id = UserId(worker * SESSIONS_PER_WORKER + i);
                    let token = store.create(user_id);

                    assert_eq!(store.get(&token).unwrap().user_id, user_id);
                    assert_eq!(store.extend(&token).unwrap().user_id, user_id);

                    // Every other session is deleted again
                    if i % 2 == 0 {
                        assert!(store.delete(&token));
                        assert_eq!(store.get(&token), Err(SessionError::NotFound));
                    } else {
                        kept.push((token, user_id));
                    }
                }
                kept
            })
        })
        .collect();

    let mut tokens = HashSet::new();
    let mut kept_total = 0;
    for handle in handles {
        for (token, user_id) in handle.await.unwrap() {
            assert_eq!(store.get(&token).unwrap().user_id, user_id);
            assert!(tokens.insert(token), "duplicate token issued");
            kept_total += 1;
        }
    }

    assert_eq!(kept_total, WORKERS * SESSIONS_PER_WORKER / 2);
    assert_eq!(store.len() as u64, kept_total);
}

const SHARED_TOKENS: usize = 64;
const ROUNDS: usize = 2_000;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_operations_on_shared_tokens() {
    let store = Arc::new(SessionStore::new(300));
    let tokens: Arc<Vec<(String, UserId)>> = Arc::new(
        (0..SHARED_TOKENS as u64)
            .map(|n| (store.create(UserId(n)), UserId(n)))
            .collect(),
    );
    // Every fourth token is deleted while the others keep being read and extended
    let doomed = |idx: usize| idx % 4 == 0;

    let handles: Vec<_> = (0..WORKERS as usize)
        .map(|worker| {
            let store = store.clone();
            let tokens = tokens.clone();
            tokio::task::spawn_blocking(move || {
                for i in 0..ROUNDS {
                    let idx = (worker * 7 + i) % SHARED_TOKENS;
                    let (token, user_id) = &tokens[idx];
                    let outcome = match (worker + i) % 4 {
                        0 => store.get(token),
                        1 => store.extend(token),
                        2 => store.authenticate(token),
                        _ => {
                            if doomed(idx) {
                                store.delete(token);
                            }
                            store.get(token)
                        }
                    };
                    match outcome {
                        Ok(session) => assert_eq!(session.user_id, *user_id),
                        Err(e) => {
                            assert_eq!(e, SessionError::NotFound);
                            assert!(doomed(idx), "live token reported {e}");
                        }
                    }
                    let authenticated = store.is_authenticated(token);
                    assert!(authenticated || doomed(idx), "live token rejected");
                }

                for (idx, (token, _)) in tokens.iter().enumerate() {
                    if doomed(idx) {
                        store.delete(token);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    for (idx, (token, user_id)) in tokens.iter().enumerate() {
        if doomed(idx) {
            assert_eq!(store.get(token), Err(SessionError::NotFound));
        } else {
            assert_eq!(store.get(token).unwrap().user_id, *user_id);
        }
    }
    assert_eq!(store.len(), SHARED_TOKENS - SHARED_TOKENS / 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_email_registration_has_one_winner() {
    let store = Arc::new(fast_credential_store());

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let store = store.clone();
            tokio::task::spawn_blocking(move || {
                store.register(&registration("race@example.com", "pw"))
            })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(user_id) => winners.push(user_id),
            Err(e) => assert_eq!(e, CredentialError::EmailAlreadyRegistered),
        }
    }

    assert_eq!(winners, vec![UserId(1)]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.login("race@example.com", "pw").unwrap().user_id, UserId(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_registrations_get_unique_ids() {
    let store = Arc::new(fast_credential_store());

    let handles: Vec<_> = (0..WORKERS)
        .map(|n| {
            let store = store.clone();
            tokio::task::spawn_blocking(move || {
                store.register(&registration(&format!("user{n}@example.com"), "pw"))
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap().unwrap()));
    }

    let expected: HashSet<_> = (1..=WORKERS).map(UserId).collect();
    assert_eq!(ids, expected);
}
