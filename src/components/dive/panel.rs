//! Floating panel for the node selected in dive mode.

use std::time::Duration;

use leptos::leptos_dom::helpers::set_timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use super::machine::{DiveMachine, PanelAction};
use crate::api;
use crate::browser::{self, BodyScroll};
use crate::config::AppConfig;

pub type SharedDive = RwSignal<DiveMachine<BodyScroll>, LocalStorage>;

/// Sends the generation request for the open panel and follows through:
/// feedback on failure, a short confirmation then a redirect on success.
fn generate(machine: SharedDive, config: AppConfig) {
	let Some(ticket) = machine.try_update(|m| m.begin_generate()).flatten() else {
		return;
	};
	spawn_local(async move {
		let result = api::generate_story(&config, &ticket.slug).await.map_err(|e| {
			warn!("backstory-graph: generating {} failed: {e:?}", ticket.slug);
			e.to_string()
		});
		let redirect = machine.try_update(|m| m.finish_generate(&ticket, result)).flatten();
		if redirect.is_none() {
			return;
		}
		set_timeout(
			move || {
				if let Some(path) = machine.try_with(|m| m.take_redirect(&ticket)).flatten() {
					browser::navigate(&path);
				}
			},
			Duration::from_millis(config.redirect_delay_ms),
		);
	});
}

#[component]
pub fn NodeActionPanel(machine: SharedDive, config: AppConfig) -> impl IntoView {
	move || {
		let panel = machine.with(|m| m.panel().cloned())?;
		let node = panel.node.clone();
		let action = match panel.action(&config.wiki_base_path) {
			PanelAction::Read(path) => view! {
				<a class="hero-cta node-panel-action" href=path>"📖 Read the story"</a>
			}
			.into_any(),
			PanelAction::Generate { busy } => {
				let config = config.clone();
				view! {
					<button
						class="hero-cta node-panel-action"
						disabled=busy
						on:click=move |_| generate(machine, config.clone())
					>
						{if busy { "Generating…" } else { "✨ Generate story" }}
					</button>
				}
				.into_any()
			}
		};

		Some(view! {
			<aside class="node-panel">
				<button
					class="node-panel-close"
					aria-label="Close"
					on:click=move |_| machine.update(|m| m.close_panel())
				>
					"×"
				</button>
				<span class="node-panel-kind">{node.kind.as_str()}</span>
				<h3 class="node-panel-title">{node.name.clone()}</h3>
				{node
					.creator_name
					.clone()
					.map(|by| view! { <p class="node-panel-creator">"by " {by}</p> })}
				<ul class="node-panel-details">
					{panel
						.details()
						.into_iter()
						.map(|line| view! { <li>{line}</li> })
						.collect_view()}
				</ul>
				{action}
				{panel
					.message()
					.map(|text| view! { <p class="node-panel-message">{text.to_string()}</p> })}
			</aside>
		})
	}
}
