//! TodoMVC in the terminal.
//!
//! The app is described with VNodes and rendered into a `MemoryTree`; the live
//! tree is printed as an outline after every update. Keys are turned into the
//! events a browser would deliver and fired at the matching live nodes:
//!
//! | Key | Event |
//! |-----|-------|
//! | text, Backspace | edit the focused input's value |
//! | Enter | `keyup` on `.new-todo`, or `keydown` on `.edit` while editing |
//! | Esc | `keydown` on `.edit` while editing, otherwise quit |
//! | Up / Down | move the selection |
//! | Tab | `change` on the selected `.toggle` |
//! | Delete | `click` on the selected `.destroy` |
//! | F2 | `dblclick` on the selected label |
//! | F3 | `click` on `.clear-completed` |
//! | F4 | `change` on `.toggle-all` |
//! | Left / Right | previous / next route |
//! | Ctrl+C | quit |
//!
//! Run with: RUST_LOG=spark_vtree=debug cargo run --example todomvc 2>todomvc.log

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use tracing_subscriber::EnvFilter;

use spark_vtree::state::{poll_event, InputEvent, KeyInput, ENTER_KEY, ESCAPE_KEY};
use spark_vtree::{
    connect, create_app, el, outline_string, App, Dispatch, Event, MemoryTree, NodeId,
    OutlineOptions, Router, Store, VNode,
};

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone)]
struct Todo {
    id: u64,
    title: String,
    completed: bool,
}

#[derive(Debug, Clone)]
struct State {
    todos: Vec<Todo>,
    filter: String,
    editing: Option<u64>,
    next_id: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            filter: "all".to_string(),
            editing: None,
            next_id: 1,
        }
    }
}

#[derive(Debug, Clone)]
enum Action {
    Add(String),
    Toggle(u64),
    Destroy(u64),
    StartEditing(u64),
    CancelEditing,
    FinishEditing(String),
    ClearCompleted,
    ToggleAll,
    SetFilter(String),
}

fn reduce(state: &State, action: Action) -> State {
    let mut next = state.clone();
    match action {
        Action::Add(title) => {
            next.todos.push(Todo {
                id: next.next_id,
                title,
                completed: false,
            });
            next.next_id += 1;
        }
        Action::Toggle(id) => {
            for todo in next.todos.iter_mut().filter(|todo| todo.id == id) {
                todo.completed = !todo.completed;
            }
        }
        Action::Destroy(id) => next.todos.retain(|todo| todo.id != id),
        Action::StartEditing(id) => next.editing = Some(id),
        Action::CancelEditing => next.editing = None,
        Action::FinishEditing(title) => {
            if let Some(id) = next.editing.take() {
                for todo in next.todos.iter_mut().filter(|todo| todo.id == id) {
                    todo.title = title.clone();
                }
            }
        }
        Action::ClearCompleted => next.todos.retain(|todo| !todo.completed),
        Action::ToggleAll => {
            let all_completed = next.todos.iter().all(|todo| todo.completed);
            for todo in &mut next.todos {
                todo.completed = !all_completed;
            }
        }
        Action::SetFilter(filter) => next.filter = filter,
    }
    next
}

fn visible<'a>(state: &'a State) -> impl Iterator<Item = &'a Todo> + 'a {
    state.todos.iter().filter(|todo| match state.filter.as_str() {
        "active" => !todo.completed,
        "completed" => todo.completed,
        _ => true,
    })
}

// =============================================================================
// COMPONENTS
// =============================================================================

/// Title from an input event, if long enough to keep.
fn entered_title(event: &Event<NodeId>) -> Option<String> {
    let title = event.value.as_deref()?.trim();
    (title.len() > 1).then(|| title.to_string())
}

fn header(dispatch: &Dispatch<Action>) -> VNode<NodeId> {
    let dispatch = dispatch.clone();
    el("header")
        .class("header")
        .child(el("h1").child("todos"))
        .child(
            el("input")
                .class("new-todo")
                .prop("placeholder", "What needs to be done?")
                .prop("autofocus", true)
                .on("keyup", move |event| {
                    if event.key_code == Some(ENTER_KEY) {
                        if let Some(title) = entered_title(event) {
                            dispatch(Action::Add(title));
                        }
                    }
                }),
        )
        .build()
}

fn todo_item(
    todo: &Todo,
    is_editing: bool,
    dispatch: &Dispatch<Action>,
    focused: &Rc<Cell<Option<NodeId>>>,
) -> VNode<NodeId> {
    let id = todo.id;
    let toggle = dispatch.clone();
    let destroy = dispatch.clone();
    let start = dispatch.clone();

    let mut class = String::new();
    if todo.completed {
        class.push_str("completed");
    }
    if is_editing {
        class.push_str(" editing");
    }

    let edit = is_editing.then(|| {
        let finish = dispatch.clone();
        let cancel = dispatch.clone();
        let focus = focused.clone();
        el("input")
            .class("edit")
            .prop("value", todo.title.as_str())
            .on("keydown", move |event| match event.key_code {
                Some(ENTER_KEY) => {
                    if let Some(title) = entered_title(event) {
                        finish(Action::FinishEditing(title));
                    }
                }
                Some(ESCAPE_KEY) => finish(Action::CancelEditing),
                _ => {}
            })
            .on("blur", move |_| cancel(Action::CancelEditing))
            .node_ref(move |node| focus.set(Some(*node)))
            .build()
    });

    el("li")
        .key(id)
        .class(class.trim())
        .prop("data-id", id.to_string())
        .child(
            el("div")
                .class("view")
                .child(
                    el("input")
                        .class("toggle")
                        .prop("type", "checkbox")
                        .prop("checked", todo.completed)
                        .on("change", move |_| toggle(Action::Toggle(id))),
                )
                .child(
                    el("label")
                        .on("dblclick", move |_| start(Action::StartEditing(id)))
                        .child(todo.title.as_str()),
                )
                .child(
                    el("button")
                        .class("destroy")
                        .on("click", move |_| destroy(Action::Destroy(id))),
                ),
        )
        .child(edit)
        .build()
}

fn main_section(
    state: &State,
    dispatch: &Dispatch<Action>,
    focused: &Rc<Cell<Option<NodeId>>>,
) -> Option<VNode<NodeId>> {
    if state.todos.is_empty() {
        return None;
    }

    let toggle_all = dispatch.clone();
    let all_completed = state.todos.iter().all(|todo| todo.completed);
    let items: Vec<VNode<NodeId>> = visible(state)
        .map(|todo| todo_item(todo, state.editing == Some(todo.id), dispatch, focused))
        .collect();

    Some(
        el("section")
            .class("main")
            .child(
                el("input")
                    .prop("id", "toggle-all")
                    .class("toggle-all")
                    .prop("type", "checkbox")
                    .prop("checked", all_completed)
                    .on("change", move |_| toggle_all(Action::ToggleAll)),
            )
            .child(el("label").prop("for", "toggle-all").child("Mark all as complete"))
            .child(el("ul").class("todo-list").child(items))
            .build(),
    )
}

fn filter_link(label: &str, href: &str, route: &str, current: &str) -> VNode<NodeId> {
    el("li")
        .child(
            el("a")
                .prop("href", href)
                .class(if route == current { "selected" } else { "" })
                .child(label),
        )
        .build()
}

fn footer(state: &State, dispatch: &Dispatch<Action>) -> Option<VNode<NodeId>> {
    if state.todos.is_empty() {
        return None;
    }

    let clear = dispatch.clone();
    let active = state.todos.iter().filter(|todo| !todo.completed).count();
    let item_text = if active == 1 { "item" } else { "items" };

    Some(
        el("footer")
            .class("footer")
            .child(
                el("span")
                    .class("todo-count")
                    .child(el("strong").child(active))
                    .child(format!(" {item_text} left")),
            )
            .child(
                el("ul")
                    .class("filters")
                    .child(filter_link("All", "#/", "all", &state.filter))
                    .child(filter_link("Active", "#/active", "active", &state.filter))
                    .child(filter_link("Completed", "#/completed", "completed", &state.filter)),
            )
            .child(
                el("button")
                    .class("clear-completed")
                    .on("click", move |_| clear(Action::ClearCompleted))
                    .child("Clear completed"),
            )
            .build(),
    )
}

fn view(
    state: &State,
    dispatch: &Dispatch<Action>,
    focused: &Rc<Cell<Option<NodeId>>>,
) -> VNode<NodeId> {
    el("div")
        .child(
            el("section")
                .class("todoapp")
                .child(header(dispatch))
                .child(main_section(state, dispatch, focused))
                .child(footer(state, dispatch)),
        )
        .child(
            el("footer")
                .class("info")
                .child(el("p").child("Double-click to edit a todo"))
                .child(el("p").child("Part of TodoMVC")),
        )
        .build()
}

// =============================================================================
// TERMINAL FRONT END
// =============================================================================

const ROUTES: [&str; 3] = ["#/", "#/active", "#/completed"];

type TodoApp = App<MemoryTree, Box<dyn FnMut() -> VNode<NodeId>>>;

/// Restores the terminal on drop.
struct RawMode;

impl RawMode {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

struct Frontend {
    app: Rc<RefCell<TodoApp>>,
    store: Store<State, Action>,
    router: Router,
    focused: Rc<Cell<Option<NodeId>>>,
    buffer: String,
    selected: usize,
    outline: String,
}

impl Frontend {
    fn find(&self, class: &str) -> Vec<NodeId> {
        let app = self.app.borrow();
        match app.root() {
            Some(root) => app.host().find_by_class(root, class),
            None => Vec::new(),
        }
    }

    fn nth(&self, class: &str, index: usize) -> Option<NodeId> {
        self.find(class).get(index).copied()
    }

    /// Fire an event with no borrow of the app held.
    fn fire(&self, event: Event<NodeId>) {
        let handler = self.app.borrow().host().handler(event.target, &event.name);
        if let Some(handler) = handler {
            handler(&event);
        }
    }

    fn editing(&self) -> Option<NodeId> {
        self.nth("edit", 0)
    }

    fn item_count(&self) -> usize {
        self.find("toggle").len()
    }

    fn start_editing(&mut self) {
        let Some(item) = self.find("view").get(self.selected).copied() else {
            return;
        };
        let label = {
            let app = self.app.borrow();
            app.host().find_by_tag(item, "label").first().copied()
        };
        if let Some(label) = label {
            self.fire(Event::new("dblclick", label));
            if let Some(input) = self.editing() {
                let value = self.app.borrow().host().property(input, "value").cloned();
                self.buffer = value.and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default();
            }
        }
    }

    fn navigate(&self, step: isize) {
        let current = ROUTES
            .iter()
            .position(|route| *route == self.router.hash())
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(ROUTES.len() as isize) as usize;
        self.router.navigate(ROUTES[next]);
    }

    /// Handle one key. Returns false to quit.
    fn handle(&mut self, key: KeyInput) -> bool {
        if key.is_interrupt() {
            return false;
        }

        let editing = self.editing();
        match (key.key_code, key.ch) {
            (_, Some(c)) if !key.ctrl => self.buffer.push(c),
            (Some(8), _) => {
                self.buffer.pop();
            }
            (Some(ENTER_KEY), _) | (Some(ESCAPE_KEY), _) if editing.is_some() => {
                if let Some(input) = editing {
                    self.fire(key.to_event("keydown", input, Some(self.buffer.clone())));
                }
                self.buffer.clear();
            }
            (Some(ESCAPE_KEY), _) => return false,
            (Some(ENTER_KEY), _) => {
                if let Some(input) = self.nth("new-todo", 0) {
                    self.fire(key.to_event("keyup", input, Some(self.buffer.clone())));
                }
                self.buffer.clear();
            }
            (Some(38), _) => self.selected = self.selected.saturating_sub(1),
            (Some(40), _) => self.selected = (self.selected + 1).min(self.item_count().saturating_sub(1)),
            (Some(9), _) => {
                if let Some(toggle) = self.nth("toggle", self.selected) {
                    self.fire(Event::new("change", toggle));
                }
            }
            (Some(46), _) => {
                if let Some(destroy) = self.nth("destroy", self.selected) {
                    self.fire(Event::new("click", destroy));
                }
            }
            (Some(113), _) => self.start_editing(),
            (Some(114), _) => {
                if let Some(button) = self.nth("clear-completed", 0) {
                    self.fire(Event::new("click", button));
                }
            }
            (Some(115), _) => {
                if let Some(toggle_all) = self.nth("toggle-all", 0) {
                    self.fire(Event::new("change", toggle_all));
                }
            }
            (Some(37), _) => self.navigate(-1),
            (Some(39), _) => self.navigate(1),
            _ => {}
        }

        self.selected = self.selected.min(self.item_count().saturating_sub(1));
        true
    }

    /// Rebuild the cached outline if the live tree changed visibly.
    fn refresh_outline(&mut self) {
        let mut app = self.app.borrow_mut();
        let visible = app
            .host_mut()
            .take_dirty()
            .iter()
            .any(|(_, flags)| flags.is_visual());
        if !visible {
            return;
        }
        self.outline = match app.root() {
            Some(root) => outline_string(app.host(), root, &OutlineOptions::default()).replace('\n', "\r\n"),
            None => String::new(),
        };
    }

    fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.refresh_outline();
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        write!(out, "{}", self.outline)?;

        let app = self.app.borrow();
        let state = self.store.state();
        let target = if self.editing().is_some() { "edit" } else { "new-todo" };
        write!(
            out,
            "\r\n{target}> {}\r\nselected: {}  route: {}  todos: {}  updates: {}  focused: {}\r\n",
            self.buffer,
            self.selected,
            self.router.route(),
            state.todos.len(),
            app.cycles(),
            self.focused.get().map_or_else(|| "-".to_string(), |node| node.to_string()),
        )?;
        out.flush()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let store = Store::new(State::default(), reduce);
    let focused = Rc::new(Cell::new(None));

    let describe: Box<dyn FnMut() -> VNode<NodeId>> = {
        let reader = store.clone();
        let dispatch = store.dispatcher();
        let focused = focused.clone();
        Box::new(move || reader.with_state(|state| view(state, &dispatch, &focused)))
    };

    let mut tree = MemoryTree::new();
    let root = tree.create_root("body");
    let app = Rc::new(RefCell::new(create_app(tree, describe, root)?));
    let _subscription = connect(&app, &store);
    let router = Router::new(&store, "#/", Action::SetFilter);

    let mut frontend = Frontend {
        app,
        store,
        router,
        focused,
        buffer: String::new(),
        selected: 0,
        outline: String::new(),
    };

    let _raw = RawMode::enter()?;
    let mut stdout = io::stdout();
    frontend.draw(&mut stdout)?;

    loop {
        match poll_event(Duration::from_millis(100))? {
            Some(InputEvent::Key(key)) => {
                if !frontend.handle(key) {
                    break;
                }
                frontend.draw(&mut stdout)?;
            }
            Some(InputEvent::Resize(..)) => frontend.draw(&mut stdout)?,
            _ => {}
        }
    }

    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    Ok(())
}
