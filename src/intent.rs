//! Intent classification - maps captured utterances to application actions
//!
//! Rules are evaluated in fixed priority order, first match wins:
//! 1. Exit / stop-listening
//! 2. System shutdown
//! 3. Help
//! 4. Cart views (show, clear)
//! 5. Order placement
//! 6. Adding products (delegates to the order extractor)
//! 7. Navigation (inventory, order history)
//! 8. Fallback: unknown command

use crate::order::ProductOrderExtractor;
use serde::Serialize;
use std::fmt;

/// Discrete application action implied by an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    WakeWordOrder,
    WakeWordInquiry,
    RepeatRequest,
    SwitchToWakeWord,
    SystemShutdown,
    Help,
    ShowCart,
    ClearCart,
    PlaceOrder,
    AddToCart,
    NavigateInventory,
    NavigateOrders,
    UnknownCommand,
    Error,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::WakeWordOrder => "wake_word_order",
            Action::WakeWordInquiry => "wake_word_inquiry",
            Action::RepeatRequest => "repeat_request",
            Action::SwitchToWakeWord => "switch_to_wake_word",
            Action::SystemShutdown => "system_shutdown",
            Action::Help => "help",
            Action::ShowCart => "show_cart",
            Action::ClearCart => "clear_cart",
            Action::PlaceOrder => "place_order",
            Action::AddToCart => "add_to_cart",
            Action::NavigateInventory => "navigate_inventory",
            Action::NavigateOrders => "navigate_orders",
            Action::UnknownCommand => "unknown_command",
            Action::Error => "error",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured response emitted for every classified command. Downstream
/// collaborators (cart persistence, UI navigation) consume this; the engine
/// itself persists nothing.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub requires_confirmation: bool,
}

impl CommandResponse {
    pub fn ok(action: Action, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            action,
            data: None,
            requires_confirmation: false,
        }
    }

    pub fn fail(action: Action, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            action,
            data: None,
            requires_confirmation: false,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// One classification rule: keyword containment predicate plus a handler
struct IntentRule {
    keywords: &'static [&'static str],
    build: fn(&IntentRouter, &str) -> CommandResponse,
}

impl IntentRule {
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

pub struct IntentRouter {
    rules: Vec<IntentRule>,
    extractor: ProductOrderExtractor,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentRouter {
    pub fn new() -> Self {
        Self {
            rules: rules(),
            extractor: ProductOrderExtractor::new(),
        }
    }

    /// Classify an utterance into a structured action. Never errors:
    /// unrecognized input degrades to an `unknown_command` retry prompt.
    pub fn classify(&self, text: &str) -> CommandResponse {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return unknown_command();
        }
        for rule in &self.rules {
            if rule.matches(&normalized) {
                return (rule.build)(self, &normalized);
            }
        }
        unknown_command()
    }
}

fn unknown_command() -> CommandResponse {
    CommandResponse::fail(
        Action::UnknownCommand,
        "Sorry, I didn't catch that. Could you say it again?",
    )
}

/// The ordered rule table. Earlier rules win.
fn rules() -> Vec<IntentRule> {
    vec![
        IntentRule {
            keywords: &["exit", "stop listening", "stop voice", "go to sleep"],
            build: |_, _| {
                CommandResponse::ok(
                    Action::SwitchToWakeWord,
                    "Okay, going back to sleep. Say the wake word when you need me.",
                )
            },
        },
        IntentRule {
            keywords: &["shut down", "shutdown", "power off", "turn yourself off"],
            build: |_, _| CommandResponse::ok(Action::SystemShutdown, "Shutting down. Goodbye."),
        },
        IntentRule {
            keywords: &["help", "what can you do", "what can i say"],
            build: |_, _| {
                CommandResponse::ok(
                    Action::Help,
                    "You can order drinks ('add two beers'), review your cart \
                     ('show cart', 'clear cart'), place the order ('place order'), \
                     or browse ('show the menu', 'my orders'). Say 'stop listening' \
                     when you're done.",
                )
            },
        },
        IntentRule {
            keywords: &[
                "show cart",
                "show the cart",
                "show my cart",
                "view cart",
                "what's in my cart",
                "whats in my cart",
                "what is in my cart",
            ],
            build: |_, _| CommandResponse::ok(Action::ShowCart, "Here's your cart."),
        },
        IntentRule {
            keywords: &[
                "clear cart",
                "clear the cart",
                "clear my cart",
                "empty cart",
                "empty the cart",
                "empty my cart",
            ],
            build: |_, _| CommandResponse::ok(Action::ClearCart, "Cart cleared."),
        },
        IntentRule {
            keywords: &[
                "place order",
                "place the order",
                "place my order",
                "place an order",
                "checkout",
                "check out",
                "complete the order",
            ],
            build: |_, _| CommandResponse::ok(Action::PlaceOrder, "Placing your order now."),
        },
        IntentRule {
            keywords: &[
                "add",
                "i want",
                "i need",
                "i'll take",
                "ill take",
                "give me",
                "get me",
                "order a",
                "order an",
                "order some",
            ],
            build: |router, text| {
                let order = router.extractor.extract(text);
                let message = format!(
                    "Added {} x {} to your cart.",
                    order.quantity, order.product_name
                );
                let data = serde_json::to_value(&order).unwrap_or_default();
                CommandResponse::ok(Action::AddToCart, message).with_data(data)
            },
        },
        IntentRule {
            keywords: &[
                "inventory",
                "menu",
                "what do you have",
                "what have you got",
                "drink list",
            ],
            build: |_, _| CommandResponse::ok(Action::NavigateInventory, "Showing the menu."),
        },
        IntentRule {
            keywords: &[
                "my orders",
                "order history",
                "past orders",
                "previous orders",
                "recent orders",
            ],
            build: |_, _| {
                CommandResponse::ok(Action::NavigateOrders, "Showing your recent orders.")
            },
        },
    ]
}
