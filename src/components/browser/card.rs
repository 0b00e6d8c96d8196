//! Media card component.

use leptos::prelude::*;
use leptos_icons::Icon;

use vidshelf_core::{Lazy, NodeId};

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/browser/card.module.css");

/// One video; the thumbnail loads once the card nears the viewport.
#[component]
pub fn Card(id: NodeId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let card = Memo::new(move |_| ctx.card(id));
    let element = NodeRef::<leptos::html::Div>::new();
    Effect::new(move |_| {
        if let Some(element) = element.get() {
            ctx.watch(id, &element);
        }
    });

    let title = move || card.with(|c| c.as_ref().map(|c| c.title.clone()).unwrap_or_default());
    let thumbnail = move || {
        card.with(|c| {
            c.as_ref()
                .map(|c| c.thumbnail.clone())
                .unwrap_or_default()
        })
    };
    let thumb_class = move || {
        if thumbnail().is_loading() {
            format!("{} {}", css::thumb, css::loading)
        } else {
            css::thumb.to_string()
        }
    };

    view! {
        <div
            node_ref=element
            class=css::card
            tabindex="0"
            data-node=id.to_string()
            on:click=move |_| ctx.spawn(ctx.nav().activate(id))
        >
            <div class=thumb_class>
                {move || match thumbnail() {
                    Lazy::Loaded(src) => view! { <img class=css::image src=src alt="" /> }.into_any(),
                    _ => view! { <span class=css::placeholder><Icon icon=ic::VIDEO /></span> }
                        .into_any(),
                }}
            </div>
            <div class=css::title>{title}</div>
        </div>
    }
}
