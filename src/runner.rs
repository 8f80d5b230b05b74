use crate::agent::Capability;
use crate::tools::web_research;
use crate::{Ctx, PipelineError, Task, Workflow};
use log::{debug, error, info};
use std::time::{Duration, Instant};

/// Passed to the `on_step` hook after each task completes.
pub struct StepEvent<'a> {
    pub task: &'a str,
    pub role: &'a str,
    pub duration: Duration,
    pub step_number: usize,
    pub total_steps: usize,
    pub output_chars: usize,
}

/// Passed to the `on_error` hook when a task fails.
pub struct ErrorEvent<'a> {
    pub task: &'a str,
    pub error: &'a PipelineError,
    pub step_number: usize,
}

/// Output of one completed task. Never modified once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub task: &'static str,
    pub text: String,
}

/// Where a runner is in its single run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    /// 1-based number of the task in flight.
    Running(usize),
    Succeeded(String),
    Failed(String),
}

/// Executes a [`Workflow`] once, task by task, in list order.
///
/// No task is retried and nothing is salvaged: the first failure ends the run
/// and earlier results are dropped. A runner is single-use; build a new one
/// for the next run.
pub struct Runner {
    wf: Workflow,
    state: RunState,
    on_step: Option<Box<dyn FnMut(&StepEvent)>>,
    on_error: Option<Box<dyn FnMut(&ErrorEvent)>>,
}

impl Runner {
    pub fn new(wf: Workflow) -> Self {
        Self {
            wf,
            state: RunState::Idle,
            on_step: None,
            on_error: None,
        }
    }

    /// Register a callback that fires after each successful task.
    pub fn on_step(mut self, cb: impl FnMut(&StepEvent) + 'static) -> Self {
        self.on_step = Some(Box::new(cb));
        self
    }

    /// Register a callback that fires when a task fails.
    pub fn on_error(mut self, cb: impl FnMut(&ErrorEvent) + 'static) -> Self {
        self.on_error = Some(Box::new(cb));
        self
    }

    /// Set both hooks to log task transitions and failures.
    pub fn with_tracing(self) -> Self {
        self.on_step(|e| {
            info!(
                "[step {}/{}] {} ({}) -> {} chars ({:.3}s)",
                e.step_number,
                e.total_steps,
                e.task,
                e.role,
                e.output_chars,
                e.duration.as_secs_f64()
            );
        })
        .on_error(|e| {
            error!("[error] {} at step {}: {}", e.task, e.step_number, e.error);
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn workflow(&self) -> &Workflow {
        &self.wf
    }

    /// Run every task and return the last task's output.
    pub fn run(&mut self, ctx: &mut Ctx) -> Result<String, PipelineError> {
        if self.state != RunState::Idle {
            return Err(PipelineError::validation(
                "runner has already been used; build a new one for each run",
            ));
        }

        let total_steps = self.wf.len();
        let mut results: Vec<TaskResult> = Vec::with_capacity(total_steps);

        for (i, task) in self.wf.tasks().iter().enumerate() {
            let step_number = i + 1;
            self.state = RunState::Running(step_number);
            info!(
                "[{}/{}] starting '{}' as {}",
                step_number, total_steps, task.name, task.role.name
            );

            let start = Instant::now();
            let result = execute(task, &results, ctx);
            let duration = start.elapsed();

            match result {
                Err(err) => {
                    if let Some(cb) = &mut self.on_error {
                        cb(&ErrorEvent {
                            task: task.name,
                            error: &err,
                            step_number,
                        });
                    }
                    ctx.log(format!("{} failed: {err}", task.name));
                    self.state = RunState::Failed(err.to_string());
                    return Err(err);
                }
                Ok(text) => {
                    if let Some(cb) = &mut self.on_step {
                        cb(&StepEvent {
                            task: task.name,
                            role: task.role.name,
                            duration,
                            step_number,
                            total_steps,
                            output_chars: text.chars().count(),
                        });
                    }
                    ctx.log(format!("{} produced {} chars", task.name, text.len()));
                    results.push(TaskResult {
                        task: task.name,
                        text,
                    });
                }
            }
        }

        // build() rejects empty workflows, so there is always a last result.
        let Some(last) = results.pop() else {
            let err = PipelineError::generation("workflow produced no result");
            self.state = RunState::Failed(err.to_string());
            return Err(err);
        };

        self.state = RunState::Succeeded(last.text.clone());
        Ok(last.text)
    }
}

/// Build the effective prompt for `task` and generate its output.
///
/// Prompt layout: description, expected output, web research (researching
/// roles only), then each dependency's output in the order listed.
fn execute(task: &Task, results: &[TaskResult], ctx: &mut Ctx) -> Result<String, PipelineError> {
    let research = match (&task.search_query, ctx.search()) {
        (Some(query), Some(search)) if task.role.has(Capability::WebSearch) => {
            let scraper = ctx
                .scraper()
                .filter(|_| task.role.has(Capability::PageScrape));
            Some(web_research(search, scraper, query, ctx.scrape_pages())?)
        }
        _ => None,
    };
    if research.is_some() {
        ctx.log(format!("{} gathered web research", task.name));
    }

    let mut request = ctx
        .llm(task.role)
        .user(task.description.as_str())
        .section("Expected output", &task.expected_output);

    if let Some(research) = &research {
        request = request.section("Web research", research);
    }

    for &dep in &task.context {
        // Workflow::build guarantees dep < current index.
        let prior = &results[dep];
        request = request.section(&format!("Context from the {} task", prior.task), &prior.text);
    }

    debug!("'{}' prompt is {} chars", task.name, request.prompt().len());

    let text = request.send()?;
    if text.trim().is_empty() {
        return Err(PipelineError::generation(format!(
            "task '{}' produced empty output",
            task.name
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentRole, DOCUMENTATION_SPECIALIST, RESEARCHER, REVIEWER};
    use crate::llm::TextGenerator;
    use crate::tools::{PageScrape, SearchHit, WebSearch};
    use std::sync::{Arc, Mutex};

    /// Answers "<task prompt first line> done" and records every prompt.
    #[derive(Default)]
    struct Recorder {
        prompts: Mutex<Vec<String>>,
        fail_on_call: Option<usize>,
        empty_on_call: Option<usize>,
    }

    impl TextGenerator for Recorder {
        fn generate(&self, prompt: &str, _role: &AgentRole) -> Result<String, PipelineError> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            let call = prompts.len();
            if self.fail_on_call == Some(call) {
                return Err(PipelineError::transient("model timed out"));
            }
            if self.empty_on_call == Some(call) {
                return Ok("   ".into());
            }
            Ok(format!("output {call}"))
        }
    }

    fn workflow() -> Workflow {
        Workflow::builder("test")
            .task(Task::new("a", &RESEARCHER, "do a", "a rubric").with_search_query("topic"))
            .task(Task::new("b", &DOCUMENTATION_SPECIALIST, "do b", "b rubric").with_context([0]))
            .task(Task::new("c", &REVIEWER, "do c", "c rubric").with_context([1, 0]))
            .build()
            .unwrap()
    }

    #[test]
    fn returns_last_task_output() {
        let generator = Arc::new(Recorder::default());
        let mut ctx = Ctx::new(generator.clone());
        let mut runner = Runner::new(workflow());

        let out = runner.run(&mut ctx).unwrap();

        assert_eq!(out, "output 3");
        assert_eq!(runner.state(), &RunState::Succeeded("output 3".into()));
        assert_eq!(generator.prompts.lock().unwrap().len(), 3);
    }

    #[test]
    fn prompt_holds_description_rubric_and_context_in_listed_order() {
        let generator = Arc::new(Recorder::default());
        let mut ctx = Ctx::new(generator.clone());
        Runner::new(workflow()).run(&mut ctx).unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("do a\n\nExpected output:\na rubric"));
        assert!(!prompts[0].contains("Context from"));
        assert!(prompts[1].ends_with("Context from the a task:\noutput 1"));

        let b = prompts[2].find("output 2").unwrap();
        let a = prompts[2].find("output 1").unwrap();
        assert!(b < a, "context follows the listed dependency order");
    }

    #[test]
    fn failure_stops_the_run() {
        let generator = Arc::new(Recorder {
            fail_on_call: Some(2),
            ..Default::default()
        });
        let mut ctx = Ctx::new(generator.clone());
        let mut runner = Runner::new(workflow());

        let err = runner.run(&mut ctx).err().unwrap();

        assert!(err.is_transient());
        assert_eq!(generator.prompts.lock().unwrap().len(), 2);
        assert!(matches!(runner.state(), RunState::Failed(msg) if msg.contains("timed out")));
    }

    #[test]
    fn empty_output_is_a_failure() {
        let generator = Arc::new(Recorder {
            empty_on_call: Some(1),
            ..Default::default()
        });
        let mut ctx = Ctx::new(generator.clone());

        let err = Runner::new(workflow()).run(&mut ctx).err().unwrap();

        assert!(err.to_string().contains("task 'a' produced empty output"));
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn runner_is_single_use() {
        let mut ctx = Ctx::new(Arc::new(Recorder::default()));
        let mut runner = Runner::new(workflow());
        runner.run(&mut ctx).unwrap();

        let err = runner.run(&mut ctx).err().unwrap();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    // --- web research ---

    struct OneHit;
    impl WebSearch for OneHit {
        fn search(&self, query: &str) -> Result<Vec<SearchHit>, PipelineError> {
            Ok(vec![SearchHit {
                title: format!("About {query}"),
                snippet: "snippet".into(),
                url: "https://example.com".into(),
            }])
        }
    }

    struct DownSearch;
    impl WebSearch for DownSearch {
        fn search(&self, _query: &str) -> Result<Vec<SearchHit>, PipelineError> {
            Err(PipelineError::transient("search unavailable"))
        }
    }

    struct Page;
    impl PageScrape for Page {
        fn scrape(&self, _url: &str) -> Result<String, PipelineError> {
            Ok("page body".into())
        }
    }

    #[test]
    fn researcher_prompt_includes_web_research() {
        let generator = Arc::new(Recorder::default());
        let mut ctx = Ctx::new(generator.clone())
            .with_search(Arc::new(OneHit))
            .with_scraper(Arc::new(Page));
        Runner::new(workflow()).run(&mut ctx).unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Web research:\n1. About topic (https://example.com)"));
        assert!(prompts[0].contains("Page excerpt: page body"));
        assert!(!prompts[1].contains("Web research"));
    }

    #[test]
    fn search_failure_fails_the_task_before_generation() {
        let generator = Arc::new(Recorder::default());
        let mut ctx = Ctx::new(generator.clone()).with_search(Arc::new(DownSearch));

        let err = Runner::new(workflow()).run(&mut ctx).err().unwrap();

        assert!(err.to_string().contains("search unavailable"));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    // --- hooks ---

    #[test]
    fn on_step_fires_per_task_in_order() {
        let steps = Arc::new(Mutex::new(Vec::new()));
        let steps_clone = Arc::clone(&steps);

        let mut runner = Runner::new(workflow()).on_step(move |e| {
            steps_clone
                .lock()
                .unwrap()
                .push((e.task.to_string(), e.step_number, e.total_steps));
        });

        let mut ctx = Ctx::new(Arc::new(Recorder::default()));
        runner.run(&mut ctx).unwrap();

        let steps = steps.lock().unwrap();
        assert_eq!(
            *steps,
            vec![
                ("a".to_string(), 1, 3),
                ("b".to_string(), 2, 3),
                ("c".to_string(), 3, 3)
            ]
        );
    }

    #[test]
    fn on_error_fires_once_with_failing_task() {
        let failed = Arc::new(Mutex::new(Vec::new()));
        let failed_clone = Arc::clone(&failed);

        let mut runner = Runner::new(workflow()).on_error(move |e| {
            failed_clone
                .lock()
                .unwrap()
                .push((e.task.to_string(), e.step_number));
        });

        let mut ctx = Ctx::new(Arc::new(Recorder {
            fail_on_call: Some(3),
            ..Default::default()
        }));
        let _ = runner.run(&mut ctx);

        assert_eq!(*failed.lock().unwrap(), vec![("c".to_string(), 3)]);
    }

    #[test]
    fn ctx_log_records_progress() {
        let mut ctx = Ctx::new(Arc::new(Recorder::default()));
        Runner::new(workflow()).run(&mut ctx).unwrap();

        assert_eq!(ctx.logs().len(), 3);
        assert_eq!(ctx.logs()[0], "a produced 8 chars");
    }
}
