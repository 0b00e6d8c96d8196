//! Description block of the displayed folder.

use leptos::prelude::*;

use vidshelf_core::NodeId;

use crate::app::AppContext;

stylance::import_crate_style!(css, "src/components/browser/description.module.css");

#[component]
pub fn Description(id: NodeId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let block = Memo::new(move |_| ctx.description().filter(|b| b.id == id));
    let element = NodeRef::<leptos::html::Section>::new();
    Effect::new(move |_| {
        if let Some(element) = element.get() {
            ctx.watch(id, &element);
        }
    });

    let poster = move || block.with(|b| b.as_ref().and_then(|b| b.poster.loaded().cloned()));
    let text = move || block.with(|b| b.as_ref().and_then(|b| b.text.loaded().cloned()));

    view! {
        <section node_ref=element class=css::description data-node=id.to_string()>
            {move || poster().map(|src| view! {
                <div class=css::posterBackground style=format!("background-image: url('{}')", src)></div>
                <img class=css::poster src=src alt="" />
            })}
            <div class=css::text>{text}</div>
        </section>
    }
}
