use the_ring::Ring;

const MAX_INITIAL_ELEMENTS: usize = 256;
const MAX_OPS: usize = 128;

#[derive(Debug, Clone, Copy)]
pub enum RingOp {
  Rotate(i16),
  Append(u8),
  Reverse,
  Filter(u8),
  Map(u8),
  RotateToValue(u8),
}

/// A ring together with a plain vector holding its expected logical order.
pub struct FuzzSession {
  pub ring:  Ring<u8>,
  pub model: Vec<u8>,
  pub ops:   Vec<RingOp>,
}

pub fn session_from_bytes(data: &[u8]) -> Option<FuzzSession> {
  let mut cursor = ByteCursor::new(data);
  let initial_len = cursor.next_usize(MAX_INITIAL_ELEMENTS);
  let initial = cursor.next_bytes(initial_len).to_vec();
  let focus = cursor.next_u16() as usize;
  let focus = if initial.is_empty() {
    0
  } else {
    focus % initial.len()
  };

  let op_count = cursor.next_usize(MAX_OPS);
  let ops = (0..op_count).map(|_| decode_op(&mut cursor)).collect();

  let mut model = initial.clone();
  model.rotate_left(focus);
  let ring = Ring::with_focus(initial, focus).ok()?;

  Some(FuzzSession { ring, model, ops })
}

pub fn apply_op(ring: &Ring<u8>, model: &mut Vec<u8>, op: RingOp) -> Ring<u8> {
  match op {
    RingOp::Rotate(n) => {
      if !model.is_empty() {
        let len = model.len() as isize;
        model.rotate_left((n as isize).rem_euclid(len) as usize);
      }
      ring.rotate(n as isize)
    },
    RingOp::Append(value) => {
      model.push(value);
      ring.append(value)
    },
    RingOp::Reverse => {
      if let Some(rest) = model.get_mut(1..) {
        rest.reverse();
      }
      ring.reversed()
    },
    RingOp::Filter(modulus) => {
      let modulus = modulus.max(2);
      model.retain(|value| value % modulus != 0);
      ring.filter(|value, _, _| value % modulus != 0)
    },
    RingOp::Map(mask) => {
      model.iter_mut().for_each(|value| *value ^= mask);
      ring.map(|value, _, _| value ^ mask)
    },
    RingOp::RotateToValue(target) => {
      if let Some(pos) = model.iter().position(|value| *value == target) {
        model.rotate_left(pos);
      }
      ring.rotate_to_value(&target)
    },
  }
}

pub fn check_invariants(ring: &Ring<u8>, model: &[u8]) {
  assert_eq!(ring.to_vec(), model);
  assert_eq!(ring.len(), model.len());
  assert_eq!(ring.focus().ok(), model.first());
  assert!(ring.is_empty() || ring.focus_index() < ring.len());

  let len = model.len() as isize;
  for offset in [-len - 1, -1, 0, 1, len, 2 * len + 3] {
    let expected = (len > 0).then(|| &model[offset.rem_euclid(len) as usize]);
    assert_eq!(ring.element_at(offset), expected);
  }

  assert_eq!(ring.reversed().reversed().to_vec(), model);
}

fn decode_op(cursor: &mut ByteCursor<'_>) -> RingOp {
  let value = cursor.next_u8();
  match cursor.next_u8() % 6 {
    0 => RingOp::Rotate(cursor.next_u16() as i16),
    1 => RingOp::Append(value),
    2 => RingOp::Reverse,
    3 => RingOp::Filter(value),
    4 => RingOp::Map(value),
    _ => RingOp::RotateToValue(value),
  }
}

struct ByteCursor<'a> {
  data: &'a [u8],
  pos:  usize,
}

impl<'a> ByteCursor<'a> {
  fn new(data: &'a [u8]) -> Self {
    Self { data, pos: 0 }
  }

  fn next_u8(&mut self) -> u8 {
    let value = self.data.get(self.pos).copied().unwrap_or(0);
    self.pos = self.pos.saturating_add(1);
    value
  }

  fn next_u16(&mut self) -> u16 {
    let lo = self.next_u8() as u16;
    let hi = self.next_u8() as u16;
    lo | (hi << 8)
  }

  fn next_usize(&mut self, max: usize) -> usize {
    if max == 0 {
      return 0;
    }
    (self.next_u16() as usize) % (max + 1)
  }

  fn next_bytes(&mut self, len: usize) -> &'a [u8] {
    let start = self.pos.min(self.data.len());
    let end = start.saturating_add(len).min(self.data.len());
    self.pos = end;
    &self.data[start..end]
  }
}
