//! Prompt templates and worked examples for every pipeline stage.
//!
//! Templates follow the ReACT pattern (Thought / Action / Observation /
//! Decision) where the stage needs structured reasoning, and a plain
//! instruction block where it only needs an analysis. Dynamic context is
//! embedded as serialized JSON. The worked examples are fixed — they exist to
//! anchor the output format, not to be tuned at runtime.

use serde_json::{json, Value};

/// Coordinator deployment prompt: which agents does this request need.
pub fn coordinator_prompt(request: &str, context: &Value) -> String {
    format!(
        "You are a Coordinator Agent using ReACT framework to orchestrate multiple academic support agents.\n\
         \n\
         AVAILABLE AGENTS:\n\
         - PLANNER: Handles scheduling and time management\n\
         - NOTEWRITER: Creates study materials and content summaries\n\
         - ADVISOR: Provides personalized academic guidance\n\
         \n\
         PARALLEL EXECUTION RULES:\n\
         1. Group compatible agents that can run concurrently\n\
         2. Maintain dependencies between agent executions\n\
         3. Coordinate results from parallel executions\n\
         \n\
         REACT PATTERN:\n\
         Thought: [Analyze request complexity and required support types]\n\
         Action: [Select optimal agent combination]\n\
         Observation: [Evaluate selected agents' capabilities]\n\
         Decision: [Finalize agent deployment plan]\n\
         \n\
         ANALYSIS POINTS:\n\
         1. Task Complexity and Scope\n\
         2. Time Constraints\n\
         3. Resource Requirements\n\
         4. Learning Style Alignment\n\
         5. Support Type Needed\n\
         \n\
         CONTEXT:\n\
         Request: {request}\n\
         Student Context: {context}\n\
         \n\
         FORMAT RESPONSE AS:\n\
         Thought: [Analysis of academic needs and context]\n\
         Action: [Agent selection and grouping strategy]\n\
         Observation: [Expected workflow and dependencies]\n\
         Decision: [Final agent deployment plan with rationale]",
        request = request,
        context = serde_json::to_string_pretty(context).unwrap_or_default(),
    )
}

/// Profile analysis prompt; the profile JSON rides in the user message.
pub const PROFILE_ANALYZER_PROMPT: &str = "\
You are a Profile Analysis Agent using the ReACT framework to analyze student profiles.

OBJECTIVE:
Analyze the student profile and extract key learning patterns that will impact their academic success.

REACT PATTERN:
Thought: Analyze what aspects of the profile need investigation
Action: Extract specific information from relevant profile sections
Observation: Note key patterns and implications
Response: Provide structured analysis

ANALYSIS FRAMEWORK:
1. Learning Characteristics: primary learning style, information processing patterns, attention span
2. Environmental Factors: optimal study environment, distraction triggers, productive time periods
3. Executive Function: task management patterns, focus duration limits, break requirements
4. Energy Management: peak energy periods, recovery patterns, fatigue signals

INSTRUCTIONS:
1. Use the ReACT pattern for each analysis area
2. Provide specific, actionable observations
3. Note both strengths and challenges
4. Identify patterns that affect study planning

FORMAT YOUR RESPONSE AS:
Thought: [Initial analysis of profile components]
Action: [Specific areas being examined]
Observation: [Patterns and insights discovered]
Analysis Summary: [Structured breakdown of key findings]
Recommendations: [Specific adaptations needed]";

/// Calendar analysis prompt; filtered events ride in the user message.
pub const CALENDAR_ANALYSIS_PROMPT: &str = "\
Analyze calendar events and identify:

Focus on:
- Available time blocks
- Energy impact of activities
- Potential conflicts
- Recovery periods
- Study opportunity windows
- Activity patterns
- Schedule optimization";

/// Task analysis prompt; active tasks ride in the user message.
pub const TASK_ANALYSIS_PROMPT: &str = "\
Analyze tasks and create priority structure:

Consider:
- Urgency levels
- Task complexity
- Energy requirements
- Dependencies
- Required focus levels
- Time estimations
- Learning objectives
- Success criteria";

/// Plan generation prompt combining the three prior analyses.
pub fn plan_generation_prompt(
    profile_analysis: &Value,
    calendar_analysis: &Value,
    task_analysis: &Value,
) -> String {
    format!(
        "AI Planning Assistant: Create focused study plan using ReACT framework.\n\
         \n\
         INPUT CONTEXT:\n\
         - Profile Analysis: {profile}\n\
         - Calendar Analysis: {calendar}\n\
         - Task Analysis: {tasks}\n\
         \n\
         EXAMPLES:\n\
         {examples}\n\
         \n\
         INSTRUCTIONS:\n\
         1. Follow ReACT pattern:\n\
         Thought: Analyze situation and needs\n\
         Action: Consider all analyses\n\
         Observation: Synthesize findings\n\
         Plan: Create structured plan\n\
         \n\
         2. Address: ADHD management strategies, energy level optimization, task chunking methods, \
         focus period scheduling, environment switching tactics, recovery period planning, \
         social/sport activity balance\n\
         \n\
         3. Include: emergency protocols, backup strategies, quick wins, reward system, \
         progress tracking, adjustment triggers\n\
         \n\
         Act as an intelligent tool to help the students reach their goals or overcome struggles \
         and answer with informal words.\n\
         \n\
         FORMAT:\n\
         Thought: [reasoning and situation analysis]\n\
         Action: [synthesis approach]\n\
         Observation: [key findings]\n\
         Plan: [actionable steps and structural schedule]",
        profile = profile_analysis,
        calendar = calendar_analysis,
        tasks = task_analysis,
        examples = serde_json::to_string_pretty(&planner_examples()).unwrap_or_default(),
    )
}

/// Learning-style analysis prompt for the NoteWriter chain.
pub fn learning_style_prompt(learning_style: &Value, request: &str) -> String {
    format!(
        "Analyze content requirements and determine optimal note structure:\n\
         \n\
         STUDENT PROFILE:\n\
         - Learning Style: {style}\n\
         - Request: {request}\n\
         \n\
         FORMAT:\n\
         1. Key Topics (80/20 principle)\n\
         2. Learning Style Adaptations\n\
         3. Time Management Strategy\n\
         4. Quick Reference Format\n\
         \n\
         FOCUS ON:\n\
         - Essential concepts that give maximum understanding\n\
         - Visual and interactive elements\n\
         - Time-optimized study methods",
        style = serde_json::to_string_pretty(learning_style).unwrap_or_default(),
        request = request,
    )
}

/// Note generation prompt fed by the learning analysis.
pub fn note_generation_prompt(analysis: &Value, learning_style: &Value, request: &str) -> String {
    format!(
        "Create concise, high-impact study materials based on analysis:\n\
         \n\
         ANALYSIS: {analysis}\n\
         LEARNING STYLE: {style}\n\
         REQUEST: {request}\n\
         \n\
         EXAMPLES:\n\
         {examples}\n\
         \n\
         FORMAT:\n\
         **THREE-WEEK INTENSIVE STUDY PLANNER**\n\
         \n\
         [Generate structured notes with:]\n\
         1. Weekly breakdown\n\
         2. Daily focus areas\n\
         3. Core concepts\n\
         4. Emergency tips",
        analysis = analysis,
        style = serde_json::to_string_pretty(learning_style).unwrap_or_default(),
        request = request,
        examples = serde_json::to_string_pretty(&notewriter_examples()).unwrap_or_default(),
    )
}

/// Situation analysis prompt for the Advisor chain.
pub fn situation_analysis_prompt(profile: &Value, learning_prefs: &Value, request: &str) -> String {
    format!(
        "Analyze student situation and determine guidance approach:\n\
         \n\
         CONTEXT:\n\
         - Profile: {profile}\n\
         - Learning Preferences: {prefs}\n\
         - Request: {request}\n\
         \n\
         ANALYZE:\n\
         1. Current challenges\n\
         2. Learning style compatibility\n\
         3. Time management needs\n\
         4. Stress management requirements",
        profile = serde_json::to_string_pretty(profile).unwrap_or_default(),
        prefs = serde_json::to_string_pretty(learning_prefs).unwrap_or_default(),
        request = request,
    )
}

/// Guidance generation prompt fed by the situation analysis.
pub fn guidance_prompt(analysis: &Value) -> String {
    format!(
        "Generate personalized academic guidance based on analysis:\n\
         \n\
         ANALYSIS: {analysis}\n\
         EXAMPLES: {examples}\n\
         \n\
         FORMAT:\n\
         1. Immediate Action Steps\n\
         2. Schedule Optimization\n\
         3. Energy Management\n\
         4. Support Strategies\n\
         5. Emergency Protocols",
        analysis = analysis,
        examples = serde_json::to_string_pretty(&advisor_examples()).unwrap_or_default(),
    )
}

/// Planner worked examples: exam prep around a football match with ADHD, and
/// a multiple-deadlines triage.
pub fn planner_examples() -> Value {
    json!([
        {
            "input": "Help with exam prep while managing ADHD and football",
            "thought": "Need to check calendar conflicts and energy patterns",
            "action": "search_calendar",
            "observation": "Football match at 6PM, exam tomorrow 9AM",
            "plan": "ADHD-OPTIMIZED SCHEDULE:\n\
                PRE-FOOTBALL (2PM-5PM):\n\
                - 3x20min study sprints\n\
                - Movement breaks\n\
                - Quick rewards after each sprint\n\n\
                FOOTBALL MATCH (6PM-8PM):\n\
                - Use as dopamine reset\n\
                - Formula review during breaks\n\n\
                POST-MATCH (9PM-12AM):\n\
                - Environment: Cafe noise\n\
                - 15/5 study/break cycles\n\
                - Location changes hourly\n\n\
                EMERGENCY PROTOCOLS:\n\
                - Focus lost: jumping jacks\n\
                - Overwhelmed: room change\n\
                - Brain fog: cold shower"
        },
        {
            "input": "Struggling with multiple deadlines",
            "thought": "Check task priorities and performance issues",
            "action": "analyze_tasks",
            "observation": "3 assignments due, lowest grade in Calculus",
            "plan": "PRIORITY SCHEDULE:\n\
                HIGH-FOCUS SLOTS:\n\
                - Morning: Calculus practice\n\
                - Post-workout: Assignments\n\
                - Night: Quick reviews\n\n\
                ADHD MANAGEMENT:\n\
                - Task timer challenges\n\
                - Reward system per completion\n\
                - Study buddy accountability"
        }
    ])
}

/// NoteWriter worked example: last-minute Calculus III review notes.
pub fn notewriter_examples() -> Value {
    json!([
        {
            "input": "Need to cram Calculus III for tomorrow",
            "template": "Quick Review",
            "notes": "CALCULUS III ESSENTIALS:\n\n\
                1. CORE CONCEPTS (80/20 Rule):\n\
                - Multiple Integrals: volume/area\n\
                - Vector Calculus: flow/force/rotation\n\
                - KEY FORMULAS: triple integrals in cylindrical/spherical coords; \
                curl, divergence, gradient relationships\n\n\
                2. COMMON EXAM PATTERNS:\n\
                - Find critical points\n\
                - Calculate flux/work\n\
                - Optimize with constraints\n\n\
                3. QUICKSTART GUIDE:\n\
                - Always draw 3D diagrams\n\
                - Check units match\n\
                - Use symmetry to simplify\n\n\
                4. EMERGENCY TIPS:\n\
                - If stuck, try converting coordinates\n\
                - Check boundary conditions\n\
                - Look for special patterns"
        }
    ])
}

/// Advisor worked example: deadline overload with hackathons in the mix.
pub fn advisor_examples() -> Value {
    json!([
        {
            "request": "Managing multiple deadlines with limited time",
            "profile": {
                "learning_style": "visual",
                "workload": "heavy",
                "time_constraints": ["2 hackathons", "project", "exam"]
            },
            "advice": "PRIORITY-BASED SCHEDULE:\n\n\
                1. IMMEDIATE ACTIONS\n\
                - Create visual timeline of all deadlines\n\
                - Break each task into 45-min chunks\n\
                - Schedule high-focus work in mornings\n\n\
                2. WORKLOAD MANAGEMENT\n\
                - Hackathons: form team early, set clear roles\n\
                - Project: daily 2-hour focused sessions\n\
                - Exam: interleaved practice with breaks\n\n\
                3. ENERGY OPTIMIZATION\n\
                - Use Pomodoro (25/5) for intensive tasks\n\
                - Physical activity between study blocks\n\
                - Regular progress tracking\n\n\
                4. EMERGENCY PROTOCOLS\n\
                - If overwhelmed: take 10min reset break\n\
                - If stuck: switch tasks or environments\n\
                - If tired: quick power nap, then review"
        }
    ])
}
