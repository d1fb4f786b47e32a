#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use triage_core::{AffordanceView, InputTab, IocRow, ModuleId, RefreshController, SubmissionKind};
use triage_engine::{
    CallError, IocView, ModuleStateTable, ModuleView, Notification, Notifier, Prompt,
    RemoteCaller, RemoteRequest, RemoteResponse, SubmitForm, WidgetHost, WorkflowContext,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(triage_logging::initialize_for_tests);
}

pub fn ok(body: &str) -> Result<RemoteResponse, CallError> {
    Ok(RemoteResponse {
        status: 200,
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: body.to_string(),
    })
}

type CallHook = Box<dyn Fn(&RemoteRequest) + Send + Sync>;

/// Caller replaying queued replies; an empty queue answers `200 ""`.
#[derive(Default)]
pub struct ScriptedCaller {
    replies: Mutex<VecDeque<Result<RemoteResponse, CallError>>>,
    requests: Mutex<Vec<RemoteRequest>>,
    hook: Mutex<Option<CallHook>>,
}

impl ScriptedCaller {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, reply: Result<RemoteResponse, CallError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Runs while the request is "in flight", before the reply is returned.
    pub fn on_call(&self, hook: impl Fn(&RemoteRequest) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RemoteCaller for ScriptedCaller {
    async fn call(&self, request: RemoteRequest) -> Result<RemoteResponse, CallError> {
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(&request);
        }
        self.requests.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| ok(""))
    }
}

#[derive(Debug, Default)]
pub struct PageState {
    pub target_url: String,
    pub display_visible: bool,
    pub modal_visible: bool,
    pub loading_visible: bool,
    pub rows: Vec<IocRow>,
    pub shared_tags: String,
    pub modules: HashMap<(SubmissionKind, ModuleId), AffordanceView>,
    pub removed_entries: Vec<String>,
    pub options: Vec<(String, String)>,
    /// Every page mutation, in order.
    pub events: Vec<String>,
}

#[derive(Default)]
pub struct RecordingPage {
    pub state: Mutex<PageState>,
}

impl RecordingPage {
    pub fn new() -> Arc<Self> {
        let page = Self::default();
        page.state.lock().unwrap().display_visible = true;
        Arc::new(page)
    }

    pub fn with_rows(rows: Vec<IocRow>, shared_tags: &str) -> Arc<Self> {
        let page = Self::new();
        {
            let mut state = page.state.lock().unwrap();
            state.rows = rows;
            state.shared_tags = shared_tags.to_string();
        }
        page
    }

    pub fn record(&self, event: impl Into<String>) {
        self.state.lock().unwrap().events.push(event.into());
    }

    pub fn module(&self, kind: SubmissionKind, module: &str) -> Option<AffordanceView> {
        self.state
            .lock()
            .unwrap()
            .modules
            .get(&(kind, ModuleId::new(module)))
            .copied()
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    /// A refresh controller whose toggle writes into this page's event log.
    pub fn refresh_toggle(self: &Arc<Self>, enabled: bool) -> RefreshController {
        let page = self.clone();
        RefreshController::with_observer(enabled, move |value| {
            page.record(format!("refresh:{value}"));
        })
    }
}

impl IocView for RecordingPage {
    fn set_target_url(&self, url: &str) {
        let mut state = self.state.lock().unwrap();
        state.target_url = url.to_string();
        state.events.push(format!("target:{url}"));
    }

    fn show_display(&self, visible: bool) {
        let mut state = self.state.lock().unwrap();
        state.display_visible = visible;
        state.events.push(format!("display:{visible}"));
    }

    fn show_modal(&self, visible: bool) {
        let mut state = self.state.lock().unwrap();
        state.modal_visible = visible;
        state.events.push(format!("modal:{visible}"));
    }

    fn show_loading(&self, visible: bool) {
        let mut state = self.state.lock().unwrap();
        state.loading_visible = visible;
        state.events.push(format!("loading:{visible}"));
    }

    fn rows(&self) -> Vec<IocRow> {
        self.state.lock().unwrap().rows.clone()
    }

    fn shared_tags(&self) -> String {
        self.state.lock().unwrap().shared_tags.clone()
    }
}

impl ModuleView for RecordingPage {
    fn render_module(&self, kind: SubmissionKind, module: &ModuleId, view: AffordanceView) {
        let mut state = self.state.lock().unwrap();
        state.modules.insert((kind, module.clone()), view);
        state.events.push(format!("module:{module}:{view:?}"));
    }
}

impl WidgetHost for RecordingPage {
    fn remove_timeline_entry(&self, entry_id: &str) {
        self.state
            .lock()
            .unwrap()
            .removed_entries
            .push(entry_id.to_string());
    }

    fn append_select_option(&self, select_id: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .options
            .push((select_id.to_string(), value.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Answers prompts from a queue; an empty queue declines.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            asked: Mutex::new(Vec::new()),
        })
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct FakeForm {
    pub tab: Option<InputTab>,
    pub url: String,
    pub hash: String,
    pub resubmits: AtomicUsize,
}

impl FakeForm {
    pub fn url(raw: &str) -> Self {
        Self {
            tab: Some(InputTab::Url),
            url: raw.to_string(),
            ..Self::default()
        }
    }

    pub fn hash(raw: &str) -> Self {
        Self {
            tab: Some(InputTab::Hash),
            hash: raw.to_string(),
            ..Self::default()
        }
    }

    pub fn resubmits(&self) -> usize {
        self.resubmits.load(Ordering::SeqCst)
    }
}

impl SubmitForm for FakeForm {
    fn expanded_tab(&self) -> Option<InputTab> {
        self.tab
    }

    fn url_input(&self) -> String {
        self.url.clone()
    }

    fn hash_input(&self) -> String {
        self.hash.clone()
    }

    fn resubmit_unchecked(&self) {
        self.resubmits.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn context(
    caller: Arc<ScriptedCaller>,
    page: Arc<RecordingPage>,
    notifier: Arc<RecordingNotifier>,
    refresh: RefreshController,
) -> WorkflowContext {
    WorkflowContext {
        caller,
        modules: page,
        notifier,
        refresh,
        states: ModuleStateTable::new(),
    }
}

pub fn row(checked: bool, value: &str, tags: &str) -> IocRow {
    IocRow {
        checked,
        value: value.to_string(),
        sources: "static".to_string(),
        tags: tags.to_string(),
    }
}
