//! Subfolder tile component.

use leptos::prelude::*;
use leptos_icons::Icon;

use vidshelf_core::{FolderState, Lazy, NodeId};

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/browser/folder.module.css");

/// One subfolder. Poster and description come from the parent's `.info/`
/// folder and fill in once the tile is populated.
#[component]
pub fn FolderTile(id: NodeId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let folder = Memo::new(move |_| ctx.folder(id));
    let element = NodeRef::<leptos::html::Div>::new();
    Effect::new(move |_| {
        if let Some(element) = element.get() {
            ctx.watch(id, &element);
        }
    });

    let name = move || folder.with(|f| f.as_ref().map(|f| f.title().to_string()).unwrap_or_default());
    let poster = move || folder.with(|f| f.as_ref().and_then(|f| f.poster.loaded().cloned()));
    let description = move || {
        folder.with(|f| match f.as_ref().map(|f| &f.description) {
            Some(Lazy::Loaded(text)) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        })
    };
    let tile_class = move || {
        let populated = folder.with(|f| f.as_ref().is_some_and(|f| f.state == FolderState::Populated));
        if populated {
            format!("{} {}", css::folder, css::loaded)
        } else {
            css::folder.to_string()
        }
    };

    view! {
        <div
            node_ref=element
            class=tile_class
            tabindex="0"
            data-node=id.to_string()
            on:click=move |_| ctx.spawn(ctx.nav().activate(id))
        >
            <div class=css::poster>
                {move || match poster() {
                    Some(src) => view! { <img class=css::image src=src alt="" /> }.into_any(),
                    None => view! { <span class=css::placeholder><Icon icon=ic::FOLDER /></span> }
                        .into_any(),
                }}
            </div>
            <div class=css::info>
                <div class=css::name>{name}</div>
                {move || description().map(|text| view! { <p class=css::description>{text}</p> })}
            </div>
        </div>
    }
}
