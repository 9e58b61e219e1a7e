use musichub_core::domain::{Isrc, ProducerCode, ProducerId, TrackId};
use musichub_core::identity::hash_uuid;
use proptest::prelude::*;

fn isrc_strategy() -> impl Strategy<Value = String> {
  "[A-Z]{2}[A-Z0-9]{3}[0-9]{7}"
}

proptest! {
  #[test]
  fn valid_codes_survive_hyphens_and_padding(raw in isrc_strategy(), cut in 1usize..11) {
    let decorated = format!("  {}-{} ", &raw[..cut], &raw[cut..]);
    let isrc = Isrc::new(&decorated).unwrap();
    prop_assert_eq!(isrc.as_str(), raw.as_str());
  }

  #[test]
  fn normalized_accepts_any_case(raw in isrc_strategy()) {
    let lower = raw.to_lowercase();
    let isrc = Isrc::normalized(&lower).unwrap();
    prop_assert_eq!(isrc.as_str(), raw.as_str());
  }

  #[test]
  fn producer_code_is_the_isrc_prefix(raw in isrc_strategy()) {
    let isrc = Isrc::new(&raw).unwrap();
    let from_isrc = isrc.producer_code();
    prop_assert_eq!(from_isrc.as_str(), &raw[..5]);
    prop_assert_eq!(&from_isrc, &ProducerCode::new(&raw).unwrap());
    prop_assert_eq!(&from_isrc, &ProducerCode::new(&raw[..5]).unwrap());
  }

  #[test]
  fn derived_ids_are_deterministic(raw in isrc_strategy()) {
    let isrc = Isrc::new(&raw).unwrap();
    prop_assert_eq!(TrackId::from_isrc(&isrc), TrackId::from_isrc(&Isrc::new(&raw).unwrap()));

    let code = isrc.producer_code();
    prop_assert_eq!(ProducerId::from_code(&code), ProducerId::from_code(&code.clone()));
    prop_assert_eq!(hash_uuid(code.as_str()).unwrap(), hash_uuid(&raw[..5]).unwrap());
  }

  #[test]
  fn wrong_length_is_always_rejected(raw in "[A-Z0-9]{0,11}|[A-Z0-9]{13,20}") {
    prop_assert!(Isrc::new(&raw).is_err());
  }

  #[test]
  fn letters_in_the_designation_are_rejected(prefix in "[A-Z]{2}[A-Z0-9]{3}[0-9]{2}", tail in "[A-Z][0-9]{4}") {
    let raw = format!("{prefix}{tail}");
    prop_assert!(Isrc::new(&raw).is_err());
  }
}
