//! Integration test for the full conversation protocol.
//!
//! Drives one conversation end-to-end over in-memory adapters:
//! 1. Intake parses the request and generates a first design
//! 2. A revision turn refines the design, preserving lineage
//! 3. Approval ranks the catalog and returns the first page
//! 4. Pagination returns the remaining entries exactly once
//! 5. Selection confirms an entry
//! 6. The configuration handoff creates and publishes the product

use std::sync::Arc;

use merch_forge::adapters::ai::MockGenerativeAi;
use merch_forge::adapters::commerce::InMemoryCommerce;
use merch_forge::adapters::http::dto::AssistantEnvelope;
use merch_forge::application::ChatService;
use merch_forge::domain::catalog::{CatalogEntry, CatalogVariant};
use merch_forge::domain::conversation::{AgentReply, ChatMessage};
use merch_forge::domain::design::DesignStatus;
use merch_forge::domain::fulfillment::FulfillmentStatus;
use merch_forge::ports::PrintProvider;

// =============================================================================
// Scripted AI classifications
// =============================================================================

const PARSE_BEAGLE: &str = r#"{
    "type": "parse",
    "productDetails": {"type": "t-shirt", "color": "black"},
    "designContent": "cartoonish beagle"
}"#;
const REQUEST_SUNGLASSES: &str =
    r#"{"type": "design_feedback", "isApproved": false, "changes": "add sunglasses"}"#;
const APPROVE: &str = r#"{"type": "design_feedback", "isApproved": true}"#;
const WANT_MORE: &str = r#"{"type": "product_choice", "action": "more"}"#;
const SELECT_FIRST: &str = r#"{"type": "product_choice", "action": "select", "index": 0}"#;

// =============================================================================
// Test fixtures
// =============================================================================

fn tee(id: u64) -> CatalogEntry {
    CatalogEntry::new(id, format!("Classic T-Shirt {id}"))
        .with_description("Comfortable cotton t-shirt")
        .with_variant(
            CatalogVariant::new(1, "Black / M", 1999)
                .with_option("color", "black")
                .with_option("material", "cotton"),
        )
}

fn mug(id: u64) -> CatalogEntry {
    CatalogEntry::new(id, format!("Ceramic Mug {id}"))
        .with_variant(CatalogVariant::new(1, "11oz", 1299).with_option("color", "white"))
}

fn stocked_commerce() -> InMemoryCommerce {
    // Three tees and two mugs; the tees outrank the mugs for this request.
    let catalog = vec![tee(1), mug(2), tee(3), mug(4), tee(5)];
    let mut commerce = InMemoryCommerce::new().with_catalog(catalog);
    for id in [1u64, 2, 3, 4, 5] {
        commerce = commerce
            .with_providers(
                id,
                vec![PrintProvider {
                    id: 29,
                    title: "CanonicalPrint".to_string(),
                }],
            )
            .with_variants(id, 29, vec![CatalogVariant::new(17, "Black / M", 1999)]);
    }
    commerce
}

fn scripted_ai() -> MockGenerativeAi {
    MockGenerativeAi::new()
        .with_chat_response(PARSE_BEAGLE)
        .with_chat_response(REQUEST_SUNGLASSES)
        .with_chat_response(APPROVE)
        .with_chat_response(WANT_MORE)
        .with_chat_response(SELECT_FIRST)
}

// =============================================================================
// End-to-end flow
// =============================================================================

#[tokio::test]
async fn full_conversation_from_idea_to_published_product() {
    let commerce = stocked_commerce();
    let created = commerce.created_drafts();
    let published = commerce.published_ids();
    let uploads = commerce.uploaded_images();
    let service = ChatService::new(Arc::new(scripted_ai()), Arc::new(commerce), Some(29));

    // Turn 1: intake -> first design.
    let (id, reply) = service
        .process(
            None,
            ChatMessage::user("I want a black t-shirt with a cartoonish beagle"),
        )
        .await
        .unwrap();
    let AgentReply::Design { design, .. } = reply else {
        panic!("expected a design reply, got {reply:?}");
    };
    assert_eq!(design.status, DesignStatus::Refining);
    assert_eq!(design.original_prompt, "cartoonish beagle");
    let first_image = design.image_url.clone();

    // Turn 2: revision keeps the lineage and replaces the image.
    let (_, reply) = service
        .process(Some(id), ChatMessage::user("can the beagle wear sunglasses?"))
        .await
        .unwrap();
    let AgentReply::Design { design, .. } = reply else {
        panic!("expected a design reply, got {reply:?}");
    };
    assert_eq!(design.original_prompt, "cartoonish beagle");
    assert!(design.current_prompt.contains("add sunglasses"));
    assert_ne!(design.image_url, first_image);
    let approved_image = design.image_url.clone();

    // Turn 3: approval -> approved design plus the first ranked page.
    let (_, reply) = service
        .process(Some(id), ChatMessage::user("looks good!"))
        .await
        .unwrap();
    let AgentReply::DesignAndProducts {
        design,
        products,
        has_more,
        status,
        ..
    } = reply
    else {
        panic!("expected design_and_products, got {reply:?}");
    };
    assert_eq!(status, DesignStatus::Approved);
    assert_eq!(design.image_url, approved_image);
    assert_eq!(products.len(), 3);
    assert!(has_more);
    // The t-shirts outrank the mugs for a black t-shirt request.
    let first_page_ids: Vec<u64> = products.iter().map(|p| p.id).collect();
    assert_eq!(first_page_ids, vec![1, 3, 5]);

    // Turn 4: pagination returns the remaining entries, none repeated.
    let (_, reply) = service
        .process(Some(id), ChatMessage::user("show me more options"))
        .await
        .unwrap();
    let AgentReply::DesignAndProducts {
        products, has_more, ..
    } = reply
    else {
        panic!("expected design_and_products, got {reply:?}");
    };
    let second_page_ids: Vec<u64> = products.iter().map(|p| p.id).collect();
    assert_eq!(second_page_ids, vec![2, 4]);
    assert!(!has_more);

    // Turn 5: selection confirms the first entry of the latest page.
    let (_, reply) = service
        .process(Some(id), ChatMessage::user("the first one"))
        .await
        .unwrap();
    let AgentReply::ProductSelection {
        selected_entry_id, ..
    } = reply
    else {
        panic!("expected product_selection, got {reply:?}");
    };
    assert_eq!(selected_entry_id, 2);

    // Handoff: configure creates and publishes the product.
    let config = service.configure(id).await.unwrap();
    assert_eq!(config.status, FulfillmentStatus::Success);
    assert!(config.saga.is_complete());

    // The commerce backend saw the approved design and one draft.
    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].1, approved_image);

    let drafts = created.lock().unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].blueprint_id, 2);
    assert_eq!(drafts[0].print_provider_id, 29);
    assert_eq!(drafts[0].variant_ids, vec![17]);

    assert_eq!(
        published.lock().unwrap().as_slice(),
        [config.product_id.clone()]
    );
}

#[tokio::test]
async fn ambiguous_turns_never_advance_the_protocol() {
    let ai = MockGenerativeAi::new()
        .with_chat_response("no json here")
        .with_chat_response("{\"type\": \"poem\"}")
        .with_chat_response("[]");
    let service = ChatService::new(Arc::new(ai), Arc::new(InMemoryCommerce::new()), None);

    let (id, reply) = service
        .process(None, ChatMessage::user("hello?"))
        .await
        .unwrap();
    assert!(matches!(reply, AgentReply::Chat { .. }));

    for _ in 0..2 {
        let (_, reply) = service
            .process(Some(id), ChatMessage::user("still just chatting"))
            .await
            .unwrap();
        // Still in intake: every reply is a re-prompt.
        assert!(matches!(reply, AgentReply::Chat { .. }));
    }
}

#[tokio::test]
async fn replies_survive_the_assistant_envelope_round_trip() {
    let commerce = stocked_commerce();
    let service = ChatService::new(Arc::new(scripted_ai()), Arc::new(commerce), Some(29));

    let (id, reply) = service
        .process(
            None,
            ChatMessage::user("I want a black t-shirt with a cartoonish beagle"),
        )
        .await
        .unwrap();

    // The HTTP surface nests the reply as a JSON string; clients must be
    // able to recover the exact structured value.
    let envelope = AssistantEnvelope::wrap(id, &reply).unwrap();
    let wire = serde_json::to_string(&envelope).unwrap();
    let parsed: AssistantEnvelope = serde_json::from_str(&wire).unwrap();
    let recovered: AgentReply = serde_json::from_str(&parsed.content).unwrap();
    assert_eq!(recovered, reply);
    assert_eq!(parsed.conversation_id, id);
}
