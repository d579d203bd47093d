extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::Events,
    vec, Env, IntoVal, String, TryIntoVal,
};

use crate::{Shipping, ShippingClient};

fn setup() -> (Env, ShippingClient<'static>) {
    let env = Env::default();
    let contract_id = env.register(Shipping, ());
    let client = ShippingClient::new(&env, &contract_id);
    (env, client)
}

#[test]
fn test_delivered_emits_arrival_alert() {
    let (env, client) = setup();
    client.shipped();
    client.delivered();

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("alert"),)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("alert").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    // Data: the fixed arrival message.
    let message: String = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(message, String::from_str(&env, "Your package has arrived"));
}

#[test]
fn test_delivered_emits_exactly_one_event() {
    let (env, client) = setup();
    client.shipped();
    client.delivered();

    // shipped() is silent; the whole lifecycle publishes a single alert.
    assert_eq!(env.events().all().len(), 1);
}

#[test]
fn test_no_event_before_delivery() {
    let (env, client) = setup();
    client.shipped();
    assert!(env.events().all().is_empty());
}

#[test]
fn test_rejected_delivery_emits_nothing() {
    let (env, client) = setup();

    // delivered() straight from Pending fails; the rolled-back invocation
    // must not leave an alert behind.
    assert!(client.try_delivered().is_err());
    assert!(env.events().all().is_empty());
}
