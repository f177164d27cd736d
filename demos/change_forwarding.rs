//! # Example: change_forwarding
//!
//! Demonstrates weak change-listener forwarding from an observable value.
//!
//! Shows how to:
//! - Raise change notifications from an [`ObservableValue`].
//! - Forward all changes, or a single property, without the source holding
//!   the callback strongly.
//! - Tear the binding down with [`ChangeForwarder::unsubscribe`].
//!
//! ## Run
//! ```bash
//! cargo run --example change_forwarding
//! ```

use msghub::{ChangeForwarder, NotifyChanged, ObservableValue};

fn main() {
    let name = ObservableValue::new("Name", String::from("unset"));

    let all = ChangeForwarder::new(&name, |property| {
        println!("[all] {property} changed");
    });
    let only_name = ChangeForwarder::for_property(&name, "Name", || {
        println!("[filtered] Name changed");
    })
    .expect("property name is not empty");

    name.set(String::from("first"));  // both forwarders fire
    name.set(String::from("first")); // equal value: nobody fires

    only_name.unsubscribe();
    name.set(String::from("second")); // only the unfiltered forwarder fires

    all.unsubscribe();
    println!("residual listeners: {}", name.change_events().listener_count()); // 0
}
