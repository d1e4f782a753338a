#![no_main]

mod common;

use std::mem;

use libfuzzer_sys::fuzz_target;

use crate::common::{
  apply_op,
  check_invariants,
  session_from_bytes,
};

fuzz_target!(|data: &[u8]| {
  let Some(mut session) = session_from_bytes(data) else {
    return;
  };
  check_invariants(&session.ring, &session.model);

  for op in mem::take(&mut session.ops) {
    let before = session.ring.clone();
    let snapshot = before.to_vec();

    session.ring = apply_op(&session.ring, &mut session.model, op);
    check_invariants(&session.ring, &session.model);

    // The source ring must be untouched by the transform.
    assert_eq!(before.to_vec(), snapshot);
  }
});
